//! Provides tools and interfaces to integrate the crate's functionality with Python.

use std::sync::Arc;

use bincode::{config, Decode, Encode};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::alphabet::Alphabet;
use crate::minimal_dfa::{Builder, Config, MinimalDfa};

#[pyclass(name = "MinimalDFA", module = "regex_mdfa.regex_mdfa_rs")]
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
pub struct PyMinimalDfa(Arc<MinimalDfa>);

#[pymethods]
impl PyMinimalDfa {
    #[new]
    #[pyo3(signature = (regex, alphabet=None, minimize=true))]
    fn __new__(
        py: Python<'_>,
        regex: &str,
        alphabet: Option<String>,
        minimize: bool,
    ) -> PyResult<Self> {
        py.allow_threads(|| {
            let config = Config::new()
                .alphabet(alphabet.map(|symbols| symbols.chars().collect::<Alphabet>()))
                .minimize(minimize);
            Builder::new()
                .configure(config)
                .build(regex)
                .map(|x| PyMinimalDfa(Arc::new(x)))
                .map_err(Into::into)
        })
    }

    fn get_next_state(&self, state: u32, input: char) -> Option<u32> {
        self.0.next_state(&state, &input)
    }

    fn is_final_state(&self, state: u32) -> bool {
        self.0.is_final_state(&state)
    }

    fn is_dead_state(&self, state: u32) -> bool {
        self.0.is_dead_state(state)
    }

    fn get_final_states(&self) -> HashSet<u32> {
        self.0.get_final_states().clone()
    }

    fn get_dead_state(&self) -> Option<u32> {
        self.0.get_dead_state()
    }

    fn get_states(&self) -> HashSet<u32> {
        self.0.get_states()
    }

    fn get_alphabet(&self) -> Vec<char> {
        self.0.get_alphabet().iter().collect()
    }

    fn get_transitions(&self) -> HashMap<u32, HashMap<char, u32>> {
        self.0.get_transitions().clone()
    }

    fn is_initial_state(&self, state: u32) -> bool {
        self.0.is_initial_state(state)
    }

    fn get_initial_state(&self) -> u32 {
        self.0.get_initial_state()
    }

    fn get_state_sequence(&self, inputs: String) -> Option<Vec<u32>> {
        self.0.get_state_sequence(&inputs[..])
    }

    fn accepts(&self, inputs: &str) -> bool {
        self.0.accepts(inputs)
    }

    fn __repr__(&self) -> String {
        format!("{:#?}", self.0)
    }

    fn __str__(&self) -> String {
        format!("{}", self.0)
    }

    fn __eq__(&self, other: &PyMinimalDfa) -> bool {
        *self.0 == *other.0
    }

    fn __deepcopy__(&self, _py: Python<'_>, _memo: Py<PyDict>) -> Self {
        PyMinimalDfa(Arc::new((*self.0).clone()))
    }

    fn __reduce__(&self) -> PyResult<(PyObject, (Vec<u8>,))> {
        Python::with_gil(|py| {
            let cls = PyModule::import(py, "regex_mdfa.regex_mdfa_rs")?.getattr("MinimalDFA")?;
            let binary_data: Vec<u8> = bincode::encode_to_vec(&self.0, config::standard())
                .map_err(|e| {
                    PyErr::new::<PyValueError, _>(format!(
                        "Serialization of MinimalDFA failed: {}",
                        e
                    ))
                })?;
            Ok((cls.getattr("from_binary")?.unbind(), (binary_data,)))
        })
    }

    #[staticmethod]
    fn from_binary(binary_data: Vec<u8>) -> PyResult<Self> {
        let dfa = MinimalDfa::from_bytes(&binary_data[..])?;
        Ok(PyMinimalDfa(Arc::new(dfa)))
    }
}

#[pymodule]
fn regex_mdfa_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyMinimalDfa>()?;

    Ok(())
}
