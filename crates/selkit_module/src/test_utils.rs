//! Test utilities for selkit_module.
//!
//! [`ScriptedEngine`] interprets a tiny line-based language so tests can
//! exercise every export convention without embedding a real runtime.
//!
//! One statement per line; blank lines and `//` comments are skipped:
//!
//! ```text
//! export <key> <json>            exports.key = json
//! replace <json>                 module.exports = json
//! define <json>                  define(json)
//! define-factory <json>          define(() => json)
//! define-deps <name|-> <r1,r2>   define(name, [r1, r2], (...deps) => ({ deps }))
//! sleep <millis>                 block the evaluating thread
//! throw <message>                fault
//! ```

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::{Definition, ModuleId, ModuleScope, ScriptEngine, ScriptError};

/// A [`ScriptEngine`] for tests that counts evaluations per module.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    evaluations: Mutex<HashMap<ModuleId, usize>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `id` has been evaluated.
    pub fn evaluations(&self, id: &ModuleId) -> usize {
        self.evaluations.lock().get(id).copied().unwrap_or(0)
    }

    /// Total evaluations across all modules.
    pub fn total_evaluations(&self) -> usize {
        self.evaluations.lock().values().sum()
    }
}

fn parse_json(text: &str) -> Result<Value, ScriptError> {
    serde_json::from_str(text).map_err(|e| ScriptError::fault(format!("bad literal: {}", e)))
}

impl ScriptEngine for ScriptedEngine {
    fn evaluate(
        &self,
        id: &ModuleId,
        source: &str,
        scope: &mut ModuleScope<'_>,
    ) -> Result<(), ScriptError> {
        *self.evaluations.lock().entry(id.clone()).or_default() += 1;

        for line in source.lines().map(str::trim) {
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let (op, rest) = line.split_once(' ').unwrap_or((line, ""));
            match op {
                "export" => {
                    let (key, value) = rest
                        .split_once(' ')
                        .ok_or_else(|| ScriptError::fault("export needs a key and a value"))?;
                    scope.set_export(key, parse_json(value)?);
                }
                "replace" => scope.replace_exports(parse_json(rest)?),
                "define" => scope.define(Definition::object(parse_json(rest)?))?,
                "define-factory" => {
                    let value = parse_json(rest)?;
                    scope.define(Definition::factory(move || Ok(value)))?;
                }
                "define-deps" => {
                    let (name, deps) = rest.split_once(' ').unwrap_or((rest, ""));
                    let name = (name != "-").then_some(name);
                    let deps: Vec<&str> = deps.split(',').filter(|d| !d.is_empty()).collect();
                    scope.define(Definition::dependent(name, deps, |resolved| {
                        let values: Vec<Value> =
                            resolved.iter().map(|exports| (**exports).clone()).collect();
                        Ok(json!({ "deps": values }))
                    }))?;
                }
                "sleep" => {
                    let millis: u64 = rest
                        .parse()
                        .map_err(|_| ScriptError::fault("sleep needs milliseconds"))?;
                    std::thread::sleep(Duration::from_millis(millis));
                }
                "throw" => return Err(ScriptError::fault(rest)),
                other => return Err(ScriptError::fault(format!("unknown statement '{}'", other))),
            }
        }
        Ok(())
    }
}
