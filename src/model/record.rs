//! Persisted schema of a buddy list.
//!
//! ```text
//! {
//!   "lo": owner,
//!   "bl": [ { "bn": name, "bb": blocked }, ... ],
//!   "mv": [ [name, type, value], ... ]
//! }
//! ```
//!
//! `mv` may be missing in records written by older versions and then reads
//! as empty. `lo` and `bl` are mandatory.

use buddyvault_error::{CodecError, StackError, VaultResult};

use super::{Buddy, BuddyList, BuddyVariable};
use crate::{
    engine::{
        codec::{decode, encode},
        policy::BuddyListPolicy,
    },
    CodecResult, Object, Value,
};

pub const KEY_LIST_OWNER: &str = "lo";
pub const KEY_MY_VARIABLES: &str = "mv";
pub const KEY_BUDDY_LIST: &str = "bl";
pub const KEY_BUDDY_NAME: &str = "bn";
pub const KEY_BUDDY_BLOCK: &str = "bb";

/// Persisted form of one buddy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuddyRecord {
    pub name: String,
    pub blocked: bool,
}

/// Persisted form of a buddy list.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub owner: String,
    pub buddies: Vec<BuddyRecord>,
    pub offline_variables: Vec<BuddyVariable>,
}

/// A buddy that could not be put back into the live list on load.
#[derive(Debug, Clone)]
pub struct SkippedBuddy {
    pub name: String,
    pub error: StackError,
}

/// Result of rebuilding a live list from a record.
#[derive(Debug, Clone)]
pub struct LoadedBuddyList {
    pub list: BuddyList,
    pub skipped: Vec<SkippedBuddy>,
}

impl LoadedBuddyList {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

impl Record {
    /// Snapshot of `list` as it should be saved: transient buddies are left
    /// out, and offline variables are kept only if `policy` allows them.
    pub fn from_list(
        list: &BuddyList,
        policy: &dyn BuddyListPolicy,
    ) -> Self {
        let buddies = list
            .buddies()
            .iter()
            .filter(|b| !policy.is_transient(b))
            .map(|b| BuddyRecord {
                name: b.name.clone(),
                blocked: b.blocked,
            })
            .collect();

        let offline_variables = if policy.allow_offline_variables() {
            list.offline_variables().cloned().collect()
        } else {
            Vec::new()
        };

        Self {
            owner: list.owner().to_string(),
            buddies,
            offline_variables,
        }
    }

    pub fn to_value(&self) -> Value {
        let buddies = self
            .buddies
            .iter()
            .map(|b| {
                Value::Object(
                    Object::new()
                        .with(KEY_BUDDY_NAME, b.name.as_str())
                        .with(KEY_BUDDY_BLOCK, b.blocked),
                )
            })
            .collect::<Vec<_>>();

        let variables = self
            .offline_variables
            .iter()
            .map(BuddyVariable::to_value)
            .collect::<Vec<_>>();

        Value::Object(
            Object::new()
                .with(KEY_LIST_OWNER, self.owner.as_str())
                .with(KEY_BUDDY_LIST, buddies)
                .with(KEY_MY_VARIABLES, variables),
        )
    }

    pub fn from_value(value: &Value) -> CodecResult<Self> {
        let root = value.expect_object("record")?;
        let owner = root.get_str(KEY_LIST_OWNER)?.to_string();

        let buddies = root
            .get_array(KEY_BUDDY_LIST)?
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path = format!("{KEY_BUDDY_LIST}[{i}]");
                let entry = entry.expect_object(&path)?;
                Ok(BuddyRecord {
                    name: entry
                        .get_str(KEY_BUDDY_NAME)
                        .map_err(|e| nested(e, &path))?
                        .to_string(),
                    blocked: entry
                        .get_bool(KEY_BUDDY_BLOCK)
                        .map_err(|e| nested(e, &path))?,
                })
            })
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(Self {
            owner,
            buddies,
            offline_variables: Self::offline_variables_from_object(root)?,
        })
    }

    /// Reads only the `mv` field of an encoded record.
    pub fn offline_variables_from_value(value: &Value) -> CodecResult<Vec<BuddyVariable>> {
        Self::offline_variables_from_object(value.expect_object("record")?)
    }

    fn offline_variables_from_object(root: &Object) -> CodecResult<Vec<BuddyVariable>> {
        let Some(mv) = root.get(KEY_MY_VARIABLES) else {
            return Ok(Vec::new());
        };
        mv.expect_array(KEY_MY_VARIABLES)?
            .iter()
            .enumerate()
            .map(|(i, v)| BuddyVariable::from_value(v, &format!("{KEY_MY_VARIABLES}[{i}]")))
            .collect()
    }

    pub fn to_bytes(&self) -> VaultResult<Vec<u8>> {
        encode(&self.to_value())
    }

    pub fn from_bytes(bytes: &[u8]) -> CodecResult<Self> {
        Self::from_value(&decode(bytes)?)
    }

    /// Rebuilds the live list, offering each stored buddy to `policy` in
    /// stored order. Rejected buddies are collected instead of failing the
    /// whole load.
    pub fn into_list(
        self,
        policy: &dyn BuddyListPolicy,
    ) -> LoadedBuddyList {
        let mut list = BuddyList::new(self.owner);
        let mut skipped = Vec::new();

        for stored in self.buddies {
            let name = stored.name.clone();
            let buddy = Buddy::new(stored.name).blocked(stored.blocked);
            if let Err(error) = list.add_buddy(buddy, policy) {
                skipped.push(SkippedBuddy { name, error });
            }
        }

        if policy.allow_offline_variables() {
            for variable in self.offline_variables {
                list.set_variable(variable);
            }
        }

        LoadedBuddyList { list, skipped }
    }
}

/// Prefixes the field of a schema error with the path of its parent.
fn nested(
    err: CodecError,
    parent: &str,
) -> CodecError {
    match err {
        CodecError::SchemaMismatch {
            field,
            expected,
            actual,
        } => CodecError::SchemaMismatch {
            field: format!("{parent}.{field}"),
            expected,
            actual,
        },
        other => other,
    }
}
