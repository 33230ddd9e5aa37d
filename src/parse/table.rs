//! Helper for the table grammar.
//!
//! ```json
//! {
//!   "Health": { "type": "integer", "value": 100 },
//!   "Address": { "type": "table", "value": { "City": { "type": "string", "value": "Orlando" } } },
//!   "Powers": { "type": "table", "class": "Power", "value": [{ "Name": { "type": "string", "value": "Flight" } }] }
//! }
//! ```
//!
//! Every key that is not `type`, `class` or `value` names a property in the
//! enclosing scope.

use std::any::Any;
use std::mem;
use std::rc::Rc;

use serde_json::Value;
use smol_str::SmolStr;
use tracing::trace;

use super::{Member, ParseHelper, SharedData};
use crate::arena::{Arena, ScopeId};
use crate::constants::{is_reserved_key, CLASS_KEY, DEFAULT_CLASS, TYPE_KEY, VALUE_KEY};
use crate::containers::Stack;
use crate::datum::{Datum, DatumKind};
use crate::factory::Factory;
use crate::options::ParseOptions;
use crate::types::TypeManager;
use crate::{Error, Result};

/// Destination of a table parse: the arena, the scope that receives top level
/// properties, and the registries used to build nested classes.
#[derive(Debug)]
pub struct SharedTableData {
    arena: Arena,
    root: ScopeId,
    factory: Rc<Factory>,
    types: Rc<TypeManager>,
    depth: usize,
}

impl SharedTableData {
    /// Parses into a fresh arena holding one empty root scope.
    pub fn new(factory: Rc<Factory>, types: Rc<TypeManager>) -> Self {
        let mut arena = Arena::new();
        let root = arena.create_scope();
        Self::with_root(arena, root, factory, types)
    }

    pub fn with_root(
        arena: Arena,
        root: ScopeId,
        factory: Rc<Factory>,
        types: Rc<TypeManager>,
    ) -> Self {
        Self {
            arena,
            root,
            factory,
            types,
            depth: 0,
        }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn set_root(&mut self, root: ScopeId) {
        self.root = root;
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    pub fn types(&self) -> &TypeManager {
        &self.types
    }

    /// Hands out the parsed graph, leaving a fresh arena and root behind.
    pub fn take_arena(&mut self) -> (Arena, ScopeId) {
        let mut arena = Arena::new();
        let root = arena.create_scope();
        (
            mem::replace(&mut self.arena, arena),
            mem::replace(&mut self.root, root),
        )
    }

    pub fn into_parts(self) -> (Arena, ScopeId) {
        (self.arena, self.root)
    }
}

impl SharedData for SharedTableData {
    fn depth(&self) -> usize {
        self.depth
    }

    fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    fn create(&self) -> Box<dyn SharedData> {
        Box::new(Self::new(Rc::clone(&self.factory), Rc::clone(&self.types)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Opened by a property key; `target` is that property.
    Property,
    /// Opened by a `value` object that built a new scope.
    Instance,
}

/// One open level of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub key: SmolStr,
    pub depth: usize,
    /// Scope that receives properties named inside this frame.
    pub context: ScopeId,
    pub class_name: SmolStr,
    /// Slot of the target datum within `context`.
    pub target: Option<usize>,
    pub origin: Origin,
}

/// What a member does to the frame stack and the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetKind(DatumKind),
    SetClass(SmolStr),
    /// Build the pending class and adopt it under the open property.
    Instantiate,
    Assign { index: usize },
    /// Append the property and push a frame for it.
    Open,
    /// Lenient shorthand: `"key": literal`.
    OpenLiteral,
}

fn reserved_string<'a>(member: &Member<'a>) -> Result<&'a str> {
    member.value.as_str().ok_or_else(|| {
        Error::malformed(format!("{:?} must hold a string", member.key))
    })
}

/// Decides what `member` means given the innermost frame and the kind of
/// that frame's target datum.
pub fn dispatch(
    member: Member<'_>,
    top: Option<&Frame>,
    target_kind: Option<DatumKind>,
    strict: bool,
) -> Result<Action> {
    if !is_reserved_key(member.key) {
        return match member.value {
            Value::Object(_) => Ok(Action::Open),
            _ if strict => Err(Error::malformed(
                "a property must be an object with \"type\" and \"value\"",
            )),
            _ => Ok(Action::OpenLiteral),
        };
    }
    if !top.is_some_and(|frame| frame.origin == Origin::Property) {
        return Err(Error::malformed(format!(
            "{:?} is only allowed inside a property object",
            member.key
        )));
    }
    match member.key {
        TYPE_KEY => {
            let name = reserved_string(&member)?;
            match DatumKind::from_name(name) {
                Some(DatumKind::Pointer) | None => {
                    Err(Error::malformed(format!("unknown type {name:?}")))
                }
                Some(kind) => Ok(Action::SetKind(kind)),
            }
        }
        CLASS_KEY => Ok(Action::SetClass(SmolStr::new(reserved_string(&member)?))),
        _ => match (member.value, target_kind) {
            (Value::Object(_), None) if strict => Err(Error::type_conflict(
                "object value for a property with no \"type\", declare \"table\"",
            )),
            (Value::Object(_), None | Some(DatumKind::Table)) => Ok(Action::Instantiate),
            (Value::Object(_), Some(kind)) => Err(Error::type_conflict(format!(
                "object value for a {kind} property"
            ))),
            (_, Some(DatumKind::Table)) => Err(Error::schema(
                "a table property takes objects as its value",
            )),
            _ => Ok(Action::Assign {
                index: member.index,
            }),
        },
    }
}

fn write_literal(datum: &mut Datum, value: &Value, index: usize, strict: bool) -> Result<()> {
    if datum.owns_storage() {
        datum.push_back_json(value, strict)
    } else {
        datum.set_json(value, index, strict)
    }
}

/// Builds scopes and datums from the table grammar into
/// [`SharedTableData`]. Declines members when the shared data is of any
/// other type.
#[derive(Debug, Clone)]
pub struct TableParseHelper {
    frames: Stack<Frame>,
    strict: bool,
}

impl TableParseHelper {
    pub fn new() -> Self {
        Self {
            frames: Stack::new(),
            strict: true,
        }
    }

    pub fn with_options(options: &ParseOptions) -> Self {
        Self::new().with_strict(options.strict)
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Open frames, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    fn target_kind(&self, arena: &Arena) -> Option<DatumKind> {
        let frame = self.frames.top()?;
        let slot = frame.target?;
        let (_, datum) = arena.get(frame.context).ok()?.get(slot)?;
        datum.kind()
    }

    fn target_mut<'a>(&self, arena: &'a mut Arena) -> Result<&'a mut Datum> {
        let frame = self
            .frames
            .top()
            .ok_or_else(|| Error::malformed("no property is open"))?;
        let slot = frame
            .target
            .ok_or_else(|| Error::malformed("the open object has no target property"))?;
        arena
            .get_mut(frame.context)?
            .slot_mut(slot)
            .ok_or_else(|| {
                Error::invalid_handle(format!("property slot {slot} is gone from {}", frame.context))
            })
    }

    fn open(&mut self, data: &mut SharedTableData, key: &str, depth: usize) -> Result<()> {
        let context = self.frames.top().map_or(data.root, |frame| frame.context);
        let slot = data.arena.get_mut(context)?.append_slot(key)?;
        self.frames.push(Frame {
            key: SmolStr::new(key),
            depth,
            context,
            class_name: SmolStr::new(DEFAULT_CLASS),
            target: Some(slot),
            origin: Origin::Property,
        });
        trace!(key, depth, %context, "push property frame");
        Ok(())
    }

    fn instantiate(&mut self, data: &mut SharedTableData, depth: usize) -> Result<()> {
        let Some(frame) = self.frames.top().cloned() else {
            return Err(Error::malformed("no property is open"));
        };
        let child = data
            .factory
            .create(&frame.class_name, &mut data.arena, &data.types)?;
        if let Err(err) = data.arena.adopt(frame.context, child, &frame.key) {
            data.arena.destroy(child)?;
            return Err(err);
        }
        trace!(key = %frame.key, class = %frame.class_name, %child, "push instance frame");
        self.frames.push(Frame {
            key: SmolStr::new(VALUE_KEY),
            depth,
            context: child,
            class_name: frame.class_name,
            target: None,
            origin: Origin::Instance,
        });
        Ok(())
    }

    fn start(&mut self, data: &mut SharedTableData, member: Member<'_>) -> Result<()> {
        let depth = data.depth;
        let target_kind = self.target_kind(&data.arena);
        let action = dispatch(member, self.frames.top(), target_kind, self.strict)?;
        trace!(key = member.key, depth, ?action, "table member");
        match action {
            Action::Open => self.open(data, member.key, depth),
            Action::OpenLiteral => {
                self.open(data, member.key, depth)?;
                let datum = self.target_mut(&mut data.arena)?;
                write_literal(datum, member.value, member.index, false)
            }
            Action::SetKind(kind) => self.target_mut(&mut data.arena)?.set_kind(kind),
            Action::SetClass(name) => {
                if let Some(frame) = self.frames.top_mut() {
                    frame.class_name = name;
                }
                Ok(())
            }
            Action::Instantiate => self.instantiate(data, depth),
            Action::Assign { index } => {
                let strict = self.strict;
                let datum = self.target_mut(&mut data.arena)?;
                write_literal(datum, member.value, index, strict)
            }
        }
    }
}

impl Default for TableParseHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseHelper for TableParseHelper {
    fn initialize(&mut self) {
        self.frames.clear();
    }

    fn clean_up(&mut self) {
        self.frames.clear();
    }

    fn start_handler(&mut self, shared: &mut dyn SharedData, member: Member<'_>) -> Result<bool> {
        let Some(data) = shared.downcast_mut::<SharedTableData>() else {
            return Ok(false);
        };
        let owner = match self.frames.top() {
            Some(frame) if is_reserved_key(member.key) => frame.key.clone(),
            _ => SmolStr::new(member.key),
        };
        self.start(data, member)
            .map_err(|err| err.with_key(owner.as_str()))?;
        Ok(true)
    }

    fn end_handler(&mut self, shared: &mut dyn SharedData, member: Member<'_>) -> Result<()> {
        let Some(data) = shared.downcast_ref::<SharedTableData>() else {
            return Ok(());
        };
        let closes = self
            .frames
            .top()
            .is_some_and(|frame| frame.key.as_str() == member.key && frame.depth == data.depth);
        if closes {
            if let Some(frame) = self.frames.pop() {
                trace!(key = %frame.key, depth = frame.depth, "pop frame");
            }
        }
        Ok(())
    }

    fn create(&self) -> Box<dyn ParseHelper> {
        Box::new(Self::new().with_strict(self.strict))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
