//! Value-function snapshots taken at reporting checkpoints.
use crate::Env;
use anyhow::Result;

/// Receives value-function snapshots from a learning method.
///
/// At configured checkpoints a method hands over its name, the current
/// iteration and lookup functions for values and (when the representation
/// tracks them) visit counts. Implementations decide what to do with the
/// snapshot; the core itself persists nothing.
pub trait ValueSnapshot<S, A> {
    /// Takes one snapshot of the value function.
    fn snapshot(
        &mut self,
        name: &str,
        iteration: u64,
        values: &dyn Fn(&S, &A) -> Result<f64>,
        visits: Option<&dyn Fn(&S, &A) -> u64>,
    ) -> Result<()>;
}

/// A snapshot sink that discards everything.
pub struct NullSnapshot;

impl<S, A> ValueSnapshot<S, A> for NullSnapshot {
    fn snapshot(
        &mut self,
        _name: &str,
        _iteration: u64,
        _values: &dyn Fn(&S, &A) -> Result<f64>,
        _visits: Option<&dyn Fn(&S, &A) -> u64>,
    ) -> Result<()> {
        Ok(())
    }
}

/// One row of a tabulated snapshot.
#[derive(Clone, Debug)]
pub struct SnapshotRow {
    /// Name of the learning agent.
    pub agent: String,
    /// Iteration the snapshot was taken at.
    pub iteration: u64,
    /// State components, in the order of the environment's columns.
    pub state: Vec<f64>,
    /// Numeric rendering of the action.
    pub action: f64,
    /// Visit count, when the representation tracks one.
    pub visit_count: Option<u64>,
    /// Action-value estimate.
    pub value: f64,
}

/// Buffers value-function snapshots over a fixed grid of states.
///
/// The grid is the environment's report states crossed with its action
/// set; every snapshot appends one row per grid cell.
pub struct GridSnapshot<E: Env> {
    columns: Vec<String>,
    states: Vec<E::State>,
    actions: Vec<E::Act>,
    rows: Vec<SnapshotRow>,
}

impl<E: Env> GridSnapshot<E> {
    /// Creates a snapshot buffer for the given environment.
    pub fn new(env: &E) -> Self {
        let mut columns = vec!["agent".to_string(), "iteration".to_string()];
        columns.extend(env.state_columns());
        columns.extend(
            ["action", "visit_count", "value"]
                .iter()
                .map(|c| c.to_string()),
        );
        Self {
            columns,
            states: env.report_states(),
            actions: env.actions().to_vec(),
            rows: Vec::new(),
        }
    }

    /// Column names of the tabulated rows.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows buffered so far.
    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }
}

impl<E: Env> ValueSnapshot<E::State, E::Act> for GridSnapshot<E> {
    fn snapshot(
        &mut self,
        name: &str,
        iteration: u64,
        values: &dyn Fn(&E::State, &E::Act) -> Result<f64>,
        visits: Option<&dyn Fn(&E::State, &E::Act) -> u64>,
    ) -> Result<()> {
        for state in &self.states {
            for action in &self.actions {
                let value = values(state, action)?;
                let visit_count = visits.map(|get| get(state, action));
                self.rows.push(SnapshotRow {
                    agent: name.to_string(),
                    iteration,
                    state: E::state_cells(state),
                    action: E::action_cell(action),
                    visit_count,
                    value,
                });
            }
        }
        Ok(())
    }
}
