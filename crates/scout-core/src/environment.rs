//! Applying a resolved installation to a build environment
//!
//! Variables hold ordered lists of values. Installations only ever add to
//! them: a value already present is not repeated and existing values are
//! never replaced.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::installation::Installation;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("Invalid placeholder regex"));

/// How values are merged into a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvAction {
    /// Add values that are not present yet, keeping order.
    Append,
    /// Remove the given values.
    Filter,
}

/// List-valued environment variables, e.g. `PATH` or `INCLUDE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    vars: BTreeMap<String, Vec<String>>,
}

impl BuildEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.vars.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn apply<I, S>(&mut self, name: &str, action: EnvAction, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match action {
            EnvAction::Append => self.append(name, values),
            EnvAction::Filter => self.filter(name, values),
        }
    }

    /// Append values not already present.
    pub fn append<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = self.vars.entry(name.to_string()).or_default();
        for value in values {
            let value = value.into();
            if !current.contains(&value) {
                current.push(value);
            }
        }
    }

    /// Drop the given values; a variable left empty is removed.
    pub fn filter<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(current) = self.vars.get_mut(name) else {
            return;
        };
        let unwanted: Vec<String> = values.into_iter().map(Into::into).collect();
        current.retain(|value| !unwanted.contains(value));
        if current.is_empty() {
            self.vars.remove(name);
        }
    }

    /// Set a single value unless the variable already has one.
    pub fn set_if_absent(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.vars.insert(name.to_string(), vec![value.into()]);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.vars
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Flatten to process environment pairs, joining list values with the
    /// platform path separator.
    pub fn to_process_env(&self) -> BTreeMap<String, String> {
        let separator = if cfg!(windows) { ";" } else { ":" };
        self.vars
            .iter()
            .map(|(name, values)| (name.clone(), values.join(separator)))
            .collect()
    }
}

/// Merge an installation's shell variables into `env`.
///
/// Templates may use `${<KIND>.INSTALL_ROOT}`, `${<KIND>.VERSION}` and any
/// of the installation's substitution variables. `<KIND>_VERSION` is
/// recorded unless the caller already set it.
pub fn apply_installation(env: &mut BuildEnvironment, installation: &Installation) -> Result<()> {
    let family = installation.kind.family();
    let mut values: BTreeMap<String, String> = installation.subst_vars.clone();
    values.insert(family.root_placeholder(), installation.root_path.to_string());
    values.insert(family.version_placeholder(), installation.version.to_string());

    let mut expanded = Vec::with_capacity(installation.shell_vars.len());
    for (name, template) in &installation.shell_vars {
        expanded.push((name, expand(template, &values)?));
    }
    for (name, value) in expanded {
        env.append(name, [value]);
    }

    if env.set_if_absent(&family.version_var(), installation.version.to_string()) {
        tracing::debug!(
            var = %family.version_var(),
            version = %installation.version,
            "recorded toolchain version"
        );
    }
    Ok(())
}

fn expand(template: &str, values: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = values
            .get(name.as_str())
            .ok_or_else(|| Error::UnresolvedPlaceholder {
                placeholder: name.as_str().to_string(),
                template: template.to_string(),
            })?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}
