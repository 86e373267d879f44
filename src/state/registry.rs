//! By-name access to the named-scalar state structs.
//!
//! The pipeline always reads and writes fields directly. This registry exists
//! for the generic paths only: parameter/variable files, experiment change-sets,
//! instruments that print arbitrary variables, sensitivity sweeps and JSON dumps.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::config::Parameters;
use crate::state::Variables;

/// Getter/setter pair for one named field.
pub struct Accessor<T> {
    pub name: &'static str,
    pub get: fn(&T) -> f64,
    pub set: fn(&mut T, f64),
}

/// Implemented by structs generated with `named_scalars!`.
pub trait NamedScalars: Sized + 'static {
    /// Every field in declaration order.
    fn accessors() -> Vec<Accessor<Self>>;
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("unknown {kind} name '{name}'")]
    UnknownName { kind: &'static str, name: String },
}

/// Declares a struct of `f64` fields with defaults, serde support and an
/// accessor table.
macro_rules! named_scalars {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident = $default:expr ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: f64, )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $( $field: $default, )* }
            }
        }

        impl $crate::state::registry::NamedScalars for $name {
            fn accessors() -> Vec<$crate::state::registry::Accessor<Self>> {
                vec![
                    $(
                        $crate::state::registry::Accessor {
                            name: stringify!($field),
                            get: |s: &$name| s.$field,
                            set: |s: &mut $name, value: f64| s.$field = value,
                        },
                    )*
                ]
            }
        }
    };
}

pub(crate) use named_scalars;

/// Name to accessor lookup for one state struct, built once.
pub struct Registry<T> {
    kind: &'static str,
    table: Vec<Accessor<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T: NamedScalars> Registry<T> {
    pub fn new(kind: &'static str) -> Self {
        let table = T::accessors();
        let index = table
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name, i))
            .collect();
        Self { kind, table, index }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|a| a.name)
    }

    pub fn get(&self, state: &T, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| (self.table[i].get)(state))
    }

    pub fn set(&self, state: &mut T, name: &str, value: f64) -> Result<(), RegistryError> {
        match self.index.get(name) {
            Some(&i) => {
                (self.table[i].set)(state, value);
                Ok(())
            }
            None => Err(RegistryError::UnknownName {
                kind: self.kind,
                name: name.to_string(),
            }),
        }
    }

    /// All values keyed by name.
    pub fn values(&self, state: &T) -> BTreeMap<String, f64> {
        self.table
            .iter()
            .map(|a| (a.name.to_string(), (a.get)(state)))
            .collect()
    }
}

/// Registries for both halves of the state store.
pub struct StateRegistry {
    pub params: Registry<Parameters>,
    pub vars: Registry<Variables>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self {
            params: Registry::new("parameter"),
            vars: Registry::new("variable"),
        }
    }

    /// Looks a name up as a variable first, then as a parameter.
    pub fn lookup(&self, p: &Parameters, v: &Variables, name: &str) -> Option<f64> {
        self.vars.get(v, name).or_else(|| self.params.get(p, name))
    }

    /// Sets a variable if one has this name, otherwise a parameter.
    pub fn assign(
        &self,
        p: &mut Parameters,
        v: &mut Variables,
        name: &str,
        value: f64,
    ) -> Result<(), RegistryError> {
        if self.vars.contains(name) {
            self.vars.set(v, name, value)
        } else {
            self.params.set(p, name, value)
        }
    }

    pub fn snapshot(&self, p: &Parameters, v: &Variables) -> ModelState {
        ModelState {
            time_min: v.t,
            step_min: v.i,
            parameters: self.params.values(p),
            variables: self.vars.values(v),
        }
    }
}

impl Default for StateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete model state by name, for dumps and diffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub time_min: f64,
    pub step_min: f64,
    pub parameters: BTreeMap<String, f64>,
    pub variables: BTreeMap<String, f64>,
}

impl ModelState {
    /// Names whose values differ between two states, with both values.
    pub fn diff(&self, other: &ModelState) -> Vec<(String, f64, f64)> {
        let mut out = changed(&self.parameters, &other.parameters);
        out.extend(changed(&self.variables, &other.variables));
        out
    }
}

fn changed(a: &BTreeMap<String, f64>, b: &BTreeMap<String, f64>) -> Vec<(String, f64, f64)> {
    a.iter()
        .filter_map(|(name, &x)| {
            let y = *b.get(name)?;
            (x.to_bits() != y.to_bits()).then(|| (name.clone(), x, y))
        })
        .collect()
}
