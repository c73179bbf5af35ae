//! PyO3 wrapper for the scenario run loop

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::SimulationError;
use crate::orchestrator::{Orchestrator, ScenarioParams};

fn to_py_err(err: SimulationError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Run a scenario given as JSON and return the outputs as JSON
///
/// # Example (from Python)
///
/// ```python
/// from housing_simulator._core import run_scenario_json
///
/// outputs = json.loads(run_scenario_json(json.dumps(scenario)))
/// print(outputs["regions"]["national"]["summary"]["end_price_index"])
/// ```
#[pyfunction]
pub fn run_scenario_json(json: &str) -> PyResult<String> {
    let params = ScenarioParams::from_json(json).map_err(to_py_err)?;
    let outputs = Orchestrator::new(params).map_err(to_py_err)?.run();
    outputs.to_json().map_err(to_py_err)
}

/// Step-by-step access to a scenario run
///
/// The run loop holds a boxed coupling hook, so instances stay on the
/// thread that created them.
#[pyclass(name = "Scenario", unsendable)]
pub struct PyScenario {
    inner: Option<Orchestrator>,
}

#[pymethods]
impl PyScenario {
    /// Validate and prepare a scenario from JSON
    ///
    /// # Errors
    ///
    /// Raises ValueError if the JSON is malformed or the scenario is invalid.
    #[new]
    fn new(json: &str) -> PyResult<Self> {
        let params = ScenarioParams::from_json(json).map_err(to_py_err)?;
        let inner = Orchestrator::new(params).map_err(to_py_err)?;
        Ok(Self { inner: Some(inner) })
    }

    /// Advance one year; returns the step index, or None when complete
    fn step_year(&mut self) -> PyResult<Option<usize>> {
        let orch = self.running()?;
        Ok(orch.step_year().map(|r| r.step))
    }

    fn current_step(&mut self) -> PyResult<usize> {
        Ok(self.running()?.current_step())
    }

    /// Finish the run (remaining years are not stepped) and return JSON
    fn finish(&mut self) -> PyResult<String> {
        let orch = self
            .inner
            .take()
            .ok_or_else(|| PyValueError::new_err("scenario already finished"))?;
        orch.finish().to_json().map_err(to_py_err)
    }
}

impl PyScenario {
    fn running(&mut self) -> PyResult<&mut Orchestrator> {
        self.inner
            .as_mut()
            .ok_or_else(|| PyValueError::new_err("scenario already finished"))
    }
}
