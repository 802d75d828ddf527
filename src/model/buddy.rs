//! Live buddy list of one owner.

use buddyvault_error::{CodecError, VaultResult};
use num_enum::TryFromPrimitive;
use serde::Serialize;

use crate::{engine::policy::BuddyListPolicy, CodecResult, Value};

/// Prefix that marks a variable as persistent across sessions.
pub const OFFLINE_VARIABLE_PREFIX: char = '$';

/// A contact in a buddy list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buddy {
    pub name: String,
    pub blocked: bool,
    /// Session-only buddies are never persisted.
    pub temp: bool,
}

impl Buddy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocked: false,
            temp: false,
        }
    }

    pub fn temporary(name: impl Into<String>) -> Self {
        Self {
            temp: true,
            ..Self::new(name)
        }
    }

    pub fn blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn is_temp(&self) -> bool {
        self.temp
    }
}

/// Type tag of a buddy variable as written in a record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, Serialize)]
pub enum VariableType {
    Null = 0,
    Bool = 1,
    Int = 2,
    Double = 3,
    Str = 4,
    Object = 5,
    Array = 6,
}

impl VariableType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Int(_) => Self::Int,
            Value::Double(_) => Self::Double,
            Value::Str(_) => Self::Str,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::Str => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// Named value attached to a buddy list owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuddyVariable {
    pub name: String,
    pub value: Value,
}

impl BuddyVariable {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Offline variables (`$`-prefixed) survive logout and are persisted.
    pub fn is_offline(&self) -> bool {
        self.name.starts_with(OFFLINE_VARIABLE_PREFIX)
    }

    pub fn var_type(&self) -> VariableType {
        VariableType::of(&self.value)
    }

    /// Positional triple `[name, type, value]`.
    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::Str(self.name.clone()),
            Value::Int(i64::from(self.var_type() as u8)),
            self.value.clone(),
        ])
    }

    /// Parses a triple written by [`to_value`](Self::to_value). `field` names
    /// the triple's position in error messages.
    pub fn from_value(
        value: &Value,
        field: &str,
    ) -> CodecResult<Self> {
        let triple = value.expect_array(field)?;
        let [name, tag, inner] = triple else {
            return Err(CodecError::wrong_type(
                field,
                "[name, type, value]",
                format!("array of {}", triple.len()),
            ));
        };

        let name = name.expect_str(&format!("{field}[0]"))?;
        let tag_field = format!("{field}[1]");
        let tag = tag.expect_int(&tag_field)?;
        let declared = u8::try_from(tag)
            .ok()
            .and_then(|t| VariableType::try_from(t).ok())
            .ok_or_else(|| CodecError::wrong_type(&tag_field, "variable type 0..=6", tag.to_string()))?;

        if VariableType::of(inner) != declared {
            return Err(CodecError::wrong_type(
                format!("{field}[2]"),
                declared.name(),
                inner.type_name(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            value: inner.clone(),
        })
    }
}

/// Buddies and variables of one owner, as held in memory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuddyList {
    owner: String,
    buddies: Vec<Buddy>,
    variables: Vec<BuddyVariable>,
}

impl BuddyList {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            buddies: Vec::new(),
            variables: Vec::new(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn buddies(&self) -> &[Buddy] {
        &self.buddies
    }

    pub fn len(&self) -> usize {
        self.buddies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buddies.is_empty()
    }

    pub fn buddy(
        &self,
        name: &str,
    ) -> Option<&Buddy> {
        self.buddies.iter().find(|b| b.name == name)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.buddy(name).is_some()
    }

    /// Adds a buddy if `policy` admits it.
    pub fn add_buddy(
        &mut self,
        buddy: Buddy,
        policy: &dyn BuddyListPolicy,
    ) -> VaultResult<()> {
        policy.admit_buddy(self, &buddy)?;
        self.buddies.push(buddy);
        Ok(())
    }

    pub fn remove_buddy(
        &mut self,
        name: &str,
    ) -> Option<Buddy> {
        let pos = self.buddies.iter().position(|b| b.name == name)?;
        Some(self.buddies.remove(pos))
    }

    /// Sets the blocked flag, returns `false` if no such buddy.
    pub fn set_blocked(
        &mut self,
        name: &str,
        blocked: bool,
    ) -> bool {
        match self.buddies.iter_mut().find(|b| b.name == name) {
            Some(buddy) => {
                buddy.blocked = blocked;
                true
            }
            None => false,
        }
    }

    pub fn variables(&self) -> &[BuddyVariable] {
        &self.variables
    }

    pub fn variable(
        &self,
        name: &str,
    ) -> Option<&BuddyVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Sets a variable, replacing one with the same name in place.
    pub fn set_variable(
        &mut self,
        variable: BuddyVariable,
    ) {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(slot) => *slot = variable,
            None => self.variables.push(variable),
        }
    }

    pub fn remove_variable(
        &mut self,
        name: &str,
    ) -> Option<BuddyVariable> {
        let pos = self.variables.iter().position(|v| v.name == name)?;
        Some(self.variables.remove(pos))
    }

    pub fn offline_variables(&self) -> impl Iterator<Item = &BuddyVariable> {
        self.variables.iter().filter(|v| v.is_offline())
    }
}
