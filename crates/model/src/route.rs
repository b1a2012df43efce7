use std::{error, fmt};

use schemars::JsonSchema;
use serde::Serialize;

use crate::{
    distance::{compute_route_distances, RouteDistances},
    stop::Stop,
    WithId,
};

/// A stop at a given (1-based) position of a route.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteStopEntry {
    pub position: usize,
    pub stop: WithId<Stop>,
    /// Known distance from the previous stop, replaces the geometric one.
    pub manual_distance_override: Option<f64>,
}

impl RouteStopEntry {
    pub fn new(position: usize, stop: WithId<Stop>) -> Self {
        Self {
            position,
            stop,
            manual_distance_override: None,
        }
    }

    pub fn with_override(mut self, distance_km: Option<f64>) -> Self {
        self.manual_distance_override = distance_km;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEditError {
    PositionOutOfRange { position: usize, len: usize },
}

impl fmt::Display for RouteEditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PositionOutOfRange { position, len } => write!(
                f,
                "position {} is out of range for a route with {} stops",
                position, len
            ),
        }
    }
}

impl error::Error for RouteEditError {}

/// An ordered list of stops as edited by a caller.
///
/// Positions are kept consecutive (`1..=len`) after every edit. The route never
/// caches distances; call [`Route::distances`] after editing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    entries: Vec<RouteStopEntry>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stops<I>(stops: I) -> Self
    where
        I: IntoIterator<Item = WithId<Stop>>,
    {
        stops
            .into_iter()
            .map(|stop| RouteStopEntry::new(0, stop))
            .collect::<Vec<_>>()
            .into()
    }

    /// Takes entries in the given order, their positions are reassigned.
    pub fn from_entries(entries: Vec<RouteStopEntry>) -> Self {
        let mut route = Self { entries };
        route.renumber();
        route
    }

    pub fn entries(&self) -> &[RouteStopEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RouteStopEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&RouteStopEntry> {
        position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    pub fn push(&mut self, stop: WithId<Stop>) {
        self.entries
            .push(RouteStopEntry::new(self.entries.len() + 1, stop));
    }

    /// Inserts a stop so that it ends up at `position`. Positions past the end
    /// append, position 0 is treated like 1.
    pub fn insert(&mut self, position: usize, stop: WithId<Stop>) {
        let index = position.saturating_sub(1).min(self.entries.len());
        self.entries.insert(index, RouteStopEntry::new(0, stop));
        self.renumber();
    }

    pub fn remove(&mut self, position: usize) -> Option<RouteStopEntry> {
        let index = self.index_of(position).ok()?;
        let removed = self.entries.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Moves the stop at `from` to `to`, shifting every stop in between by one.
    pub fn move_stop(&mut self, from: usize, to: usize) -> Result<(), RouteEditError> {
        let from_index = self.index_of(from)?;
        let to_index = self.index_of(to)?;
        let entry = self.entries.remove(from_index);
        self.entries.insert(to_index, entry);
        self.renumber();
        Ok(())
    }

    pub fn set_override(
        &mut self,
        position: usize,
        distance_km: Option<f64>,
    ) -> Result<(), RouteEditError> {
        let index = self.index_of(position)?;
        self.entries[index].manual_distance_override = distance_km;
        Ok(())
    }

    pub fn distances(&self) -> RouteDistances {
        compute_route_distances(&self.entries)
    }

    fn index_of(&self, position: usize) -> Result<usize, RouteEditError> {
        if position == 0 || position > self.entries.len() {
            return Err(RouteEditError::PositionOutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(position - 1)
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.position = index + 1;
        }
    }
}

impl From<Vec<RouteStopEntry>> for Route {
    fn from(entries: Vec<RouteStopEntry>) -> Self {
        Self::from_entries(entries)
    }
}
