use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use uuid::Uuid;

use crate::storage::models::ScheduleRow;
use crate::storage::source::{ScheduleAssignment, SourceError};

/// Zuordnung alter Besitzername -> ID des neu angelegten Users.
///
/// Die User werden außerhalb dieses Tools angelegt; die Datei ist ein
/// JSON-Objekt `{ "<name>": "<uuid>", ... }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ScheduleOwnerMapping {
    owners: HashMap<String, Uuid>,
}

impl ScheduleOwnerMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| SourceError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    #[cfg(test)]
    pub fn insert(&mut self, owner: &str, user_id: Uuid) {
        self.owners.insert(owner.to_string(), user_id);
    }

    pub fn resolve(&self, owner: &str) -> Option<Uuid> {
        self.owners.get(owner).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Ergebnis der Dienstplan-Planung. Wird nur geloggt, nie geschrieben.
#[derive(Debug, Clone, Default)]
pub struct SchedulePlan {
    pub resolved: Vec<ScheduleRow>,
    pub pending: Vec<ScheduleAssignment>,
}

impl SchedulePlan {
    /// Besitzer ohne angelegte Identity, sortiert und ohne Duplikate
    pub fn pending_owners(&self) -> Vec<String> {
        self.pending
            .iter()
            .filter_map(ScheduleAssignment::owner_name)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Offene Einträge ganz ohne Besitzer
    pub fn unassigned(&self) -> usize {
        self.pending
            .iter()
            .filter(|a| a.owner_name().is_none())
            .count()
    }
}

pub fn plan_schedules(
    assignments: &[ScheduleAssignment],
    mapping: &ScheduleOwnerMapping,
) -> SchedulePlan {
    let mut plan = SchedulePlan::default();

    for assignment in assignments {
        let usuario_id = assignment
            .owner_name()
            .and_then(|owner| mapping.resolve(&owner));

        match usuario_id {
            Some(usuario_id) => plan.resolved.push(ScheduleRow {
                slot: assignment.slot.clone(),
                dia: assignment.day.clone(),
                usuario_id,
            }),
            None => plan.pending.push(assignment.clone()),
        }
    }

    plan
}
