use super::slist::{Iter, SList};

/// LIFO stack over [`SList`]; the top is the list front.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack<T> {
    items: SList<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: SList::new() }
    }

    pub fn push(&mut self, value: T) -> &mut T {
        self.items.push_front(value)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn top(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.items.front_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates from the top down.
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}
