//! The stage type and the left-to-right pipeline runner.

use std::fmt;

use framepipe_result::Result;

use crate::value::Value;

/// A deferred, reusable table transformation.
///
/// Stages capture their construction-time arguments and nothing else; they
/// hold no per-run state, so one stage value can be applied to any number of
/// tables across any number of pipeline runs. Construction never touches
/// data — all work, including directive-string parsing and column-name
/// resolution, happens when the runner applies the stage.
pub struct Stage {
    name: &'static str,
    run: Box<dyn Fn(Value) -> Result<Value> + Send + Sync>,
}

impl Stage {
    pub(crate) fn new<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }

    /// The builder this stage came from (`"select"`, `"filter"`, ...).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the stage to a value.
    pub fn apply(&self, input: Value) -> Result<Value> {
        (self.run)(input)
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("name", &self.name).finish()
    }
}

/// Thread `initial` through `stages`, strictly left to right.
///
/// Zero stages returns `initial` unchanged. The first stage error aborts the
/// run; later stages are not applied and nothing is rolled back (the mutate
/// stages may already have assigned columns into the flowing table).
pub fn pipeline<I, S>(initial: I, stages: S) -> Result<Value>
where
    I: Into<Value>,
    S: IntoIterator<Item = Stage>,
{
    let mut value = initial.into();
    for stage in stages {
        tracing::debug!(
            stage = stage.name(),
            rows_in = value.row_count(),
            "applying pipeline stage"
        );
        value = stage.apply(value)?;
    }
    Ok(value)
}
