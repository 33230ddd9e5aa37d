use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::{Member, ParseHelper, SharedData};
use crate::options::ParseOptions;
use crate::{Error, Result};

/// Drives one parse session: walks the document and offers every member to
/// the registered helpers in registration order. The first helper that
/// accepts a member owns it.
pub struct ParseCoordinator {
    helpers: Vec<Box<dyn ParseHelper>>,
    shared: Box<dyn SharedData>,
    options: ParseOptions,
    is_clone: bool,
    file_name: Option<PathBuf>,
}

impl ParseCoordinator {
    pub fn new(shared: impl SharedData) -> Self {
        Self::with_options(shared, ParseOptions::default())
    }

    pub fn with_options(shared: impl SharedData, options: ParseOptions) -> Self {
        Self {
            helpers: Vec::new(),
            shared: Box::new(shared),
            options,
            is_clone: false,
            file_name: None,
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn is_clone(&self) -> bool {
        self.is_clone
    }

    /// The last file handed to [`ParseCoordinator::parse_file`].
    pub fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    fn ensure_original(&self, action: &str) -> Result<()> {
        if self.is_clone {
            return Err(Error::invalid_argument(format!(
                "cannot {action} on a cloned parse coordinator"
            )));
        }
        Ok(())
    }

    /// Registers `helper`. Only one helper per type is allowed.
    pub fn add_helper<H: ParseHelper>(&mut self, helper: H) -> Result<()> {
        self.ensure_original("add helpers")?;
        if self.helpers.iter().any(|existing| existing.is::<H>()) {
            return Err(Error::invalid_argument(format!(
                "a helper of type {} is already registered",
                std::any::type_name::<H>()
            )));
        }
        self.helpers.push(Box::new(helper));
        debug!(helper = std::any::type_name::<H>(), "add helper");
        Ok(())
    }

    /// Removes the helper of type `H`, returning whether one was registered.
    pub fn remove_helper<H: ParseHelper>(&mut self) -> Result<bool> {
        self.ensure_original("remove helpers")?;
        let before = self.helpers.len();
        self.helpers.retain(|helper| !helper.is::<H>());
        Ok(self.helpers.len() != before)
    }

    pub fn helper_count(&self) -> usize {
        self.helpers.len()
    }

    pub fn helper<H: ParseHelper>(&self) -> Option<&H> {
        self.helpers
            .iter()
            .find_map(|helper| helper.downcast_ref::<H>())
    }

    pub fn shared_data(&self) -> &dyn SharedData {
        self.shared.as_ref()
    }

    pub fn shared_data_mut(&mut self) -> &mut dyn SharedData {
        self.shared.as_mut()
    }

    pub fn shared_as<T: SharedData>(&self) -> Option<&T> {
        self.shared.downcast_ref::<T>()
    }

    pub fn shared_as_mut<T: SharedData>(&mut self) -> Option<&mut T> {
        self.shared.downcast_mut::<T>()
    }

    /// Replaces the shared data, returning the previous one.
    pub fn set_shared_data(&mut self, shared: impl SharedData) -> Result<Box<dyn SharedData>> {
        self.ensure_original("replace shared data")?;
        Ok(std::mem::replace(&mut self.shared, Box::new(shared)))
    }

    pub fn into_shared_data(self) -> Box<dyn SharedData> {
        self.shared
    }

    pub fn initialize(&mut self) {
        for helper in self.helpers.iter_mut() {
            helper.initialize();
        }
        self.shared.initialize();
    }

    pub fn clean_up(&mut self) {
        for helper in self.helpers.iter_mut() {
            helper.clean_up();
        }
        self.shared.clean_up();
    }

    pub fn parse_str(&mut self, input: &str) -> Result<()> {
        let value: Value = serde_json::from_str(input)?;
        self.parse_value(&value)
    }

    pub fn parse_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let value: Value = serde_json::from_reader(reader)?;
        self.parse_value(&value)
    }

    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.file_name = Some(path.to_path_buf());
        self.parse_reader(BufReader::new(file))
    }

    /// Parses an already decoded document. The root must be an object.
    /// Without helpers this does nothing.
    pub fn parse_value(&mut self, value: &Value) -> Result<()> {
        if self.helpers.is_empty() {
            debug!("no helpers registered, skipping parse");
            return Ok(());
        }
        let Value::Object(members) = value else {
            return Err(Error::malformed("document root must be an object"));
        };
        self.initialize();
        debug!(members = members.len(), "parse start");
        let result = self.parse_root(members);
        if result.is_err() {
            self.shared.set_depth(0);
        }
        self.clean_up();
        debug!(ok = result.is_ok(), "parse end");
        result
    }

    fn parse_root(&mut self, members: &Map<String, Value>) -> Result<()> {
        self.enter()?;
        for (key, value) in members {
            self.parse_member(Member::new(key, value))?;
        }
        self.shared.decrement_depth();
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        let depth = self.shared.increment_depth();
        if depth > self.options.max_depth {
            return Err(Error::malformed(format!(
                "document nests deeper than {} objects",
                self.options.max_depth
            )));
        }
        Ok(())
    }

    fn parse_member(&mut self, member: Member<'_>) -> Result<()> {
        match member.value {
            Value::Object(members) => {
                self.enter()?;
                if let Some(index) = self.offer(member)? {
                    for (key, value) in members {
                        self.parse_member(Member::new(key, value))?;
                    }
                    self.helpers[index].end_handler(self.shared.as_mut(), member)?;
                }
                self.shared.decrement_depth();
                Ok(())
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let element = Member::element(member.key, item, index);
                    if item.is_object() {
                        self.parse_member(element)?;
                    } else {
                        self.parse_leaf(element)?;
                    }
                }
                Ok(())
            }
            _ => self.parse_leaf(member),
        }
    }

    fn parse_leaf(&mut self, member: Member<'_>) -> Result<()> {
        if let Some(index) = self.offer(member)? {
            self.helpers[index].end_handler(self.shared.as_mut(), member)?;
        }
        Ok(())
    }

    /// Index of the first helper that accepts `member`.
    fn offer(&mut self, member: Member<'_>) -> Result<Option<usize>> {
        for (index, helper) in self.helpers.iter_mut().enumerate() {
            if helper.start_handler(self.shared.as_mut(), member)? {
                trace!(key = member.key, index = member.index, helper = index, "member accepted");
                return Ok(Some(index));
            }
        }
        trace!(key = member.key, "member declined by every helper");
        Ok(None)
    }
}

/// A clone gets fresh shared data and fresh helpers of the same types. It
/// cannot change its helpers or shared data afterwards.
impl Clone for ParseCoordinator {
    fn clone(&self) -> Self {
        Self {
            helpers: self.helpers.iter().map(|helper| helper.create()).collect(),
            shared: self.shared.create(),
            options: self.options.clone(),
            is_clone: true,
            file_name: self.file_name.clone(),
        }
    }
}

impl fmt::Debug for ParseCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseCoordinator")
            .field("helpers", &self.helpers.len())
            .field("depth", &self.shared.depth())
            .field("options", &self.options)
            .field("is_clone", &self.is_clone)
            .field("file_name", &self.file_name)
            .finish()
    }
}
