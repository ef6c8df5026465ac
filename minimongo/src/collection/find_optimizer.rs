use crate::collection::{FindPlan, ObjectId};
use crate::common::{Value, DOC_ID};
use crate::filter::Filter;
use crate::index::FieldIndex;
use std::collections::BTreeMap;

/// Derives a [FindPlan] from a filter and the indices of a collection.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FindOptimizer;

impl FindOptimizer {
    pub fn create_find_plan(
        &self,
        filter: &Filter,
        indices: &BTreeMap<String, FieldIndex>,
    ) -> FindPlan {
        let mut id_lookup: Option<ObjectId> = None;
        let mut index_scans: Vec<(usize, String, Value)> = Vec::new();
        let mut remaining = Vec::new();

        for (field, value) in filter.clauses() {
            if field == DOC_ID {
                if let (None, Value::ObjectId(id)) = (id_lookup, value) {
                    id_lookup = Some(*id);
                    continue;
                }
            }

            match indices.get(field) {
                Some(index) => {
                    let run = index.lookup(value).len();
                    index_scans.push((run, field.clone(), value.clone()));
                }
                None => remaining.push((field.clone(), value.clone())),
            }
        }

        // an id lookup already narrows to one document
        if id_lookup.is_some() {
            remaining.extend(index_scans.drain(..).map(|(_, field, value)| (field, value)));
        }

        // stable, so equal runs keep filter order
        index_scans.sort_by_key(|(run, _, _)| *run);

        let plan = FindPlan::new(
            id_lookup,
            index_scans
                .into_iter()
                .map(|(_, field, value)| (field, value))
                .collect(),
            remaining,
        );
        log::debug!("Find plan for '{}': {}", filter, plan);
        plan
    }
}
