use std::any::Any;

/// Per-session state threaded through every helper call.
///
/// The coordinator only relies on the depth counter and the two lifecycle
/// hooks. Anything else a grammar needs lives on the implementing type and is
/// reached with `downcast_mut` on `dyn SharedData`.
pub trait SharedData: Any {
    fn depth(&self) -> usize;

    fn set_depth(&mut self, depth: usize);

    fn increment_depth(&mut self) -> usize {
        let depth = self.depth() + 1;
        self.set_depth(depth);
        depth
    }

    fn decrement_depth(&mut self) -> usize {
        let depth = self.depth().saturating_sub(1);
        self.set_depth(depth);
        depth
    }

    /// Called before every parse. Resets the depth.
    fn initialize(&mut self) {
        self.set_depth(0);
    }

    fn clean_up(&mut self) {}

    /// A fresh instance of the same concrete type for a cloned coordinator.
    fn create(&self) -> Box<dyn SharedData>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn SharedData {
    pub fn is<T: SharedData>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: SharedData>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SharedData>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Shared data that carries nothing but the depth counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthOnly {
    depth: usize,
}

impl DepthOnly {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedData for DepthOnly {
    fn depth(&self) -> usize {
        self.depth
    }

    fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    fn create(&self) -> Box<dyn SharedData> {
        Box::new(Self::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
