// src/pipeline.rs - Per-query orchestration: resolved name -> ranked candidates -> proposal
use log::{debug, warn};
use rayon::prelude::*;

use crate::linking::decision::decide;
use crate::matching::index::EntityIndex;
use crate::matching::ranker::{self, rank};
use crate::models::matching::{LinkProposal, MatchCandidate, QueryInput, Resolution};
use crate::utils::config::{LinkConfig, MatchConfig};

/// Read-only view over one directory snapshot plus the active policies.
/// Safe to share across threads; every call is independent.
pub struct LinkingPipeline<'a> {
    index: &'a EntityIndex<'a>,
    match_config: MatchConfig,
    link_config: LinkConfig,
}

impl<'a> LinkingPipeline<'a> {
    pub fn new(index: &'a EntityIndex<'a>, match_config: MatchConfig, link_config: LinkConfig) -> Self {
        Self {
            index,
            match_config,
            link_config,
        }
    }

    pub fn index(&self) -> &EntityIndex<'a> {
        self.index
    }

    pub fn match_config(&self) -> &MatchConfig {
        &self.match_config
    }

    pub fn link_config(&self) -> &LinkConfig {
        &self.link_config
    }

    /// Rank the resolved name and decide. Unresolved names are not ranked at all.
    pub fn propose(
        &self,
        query_name: &str,
        resolution: &Resolution,
        identifier: Option<&str>,
    ) -> LinkProposal<'a> {
        let resolved_name = resolution.resolved_name();
        let candidates: Vec<MatchCandidate<'a>> = match resolved_name {
            Some(name) => rank(self.index, name, identifier, &self.match_config),
            None => {
                debug!("Skipping ranking for unresolved name {:?}", query_name);
                Vec::new()
            }
        };
        decide(
            query_name,
            resolved_name,
            identifier,
            &candidates,
            &self.link_config,
        )
    }

    /// Proposals for many queries in parallel, paired with their resolutions by position.
    /// Output order matches input order. Unpaired trailing items are dropped with a warning.
    pub fn propose_batch(
        &self,
        queries: &[QueryInput],
        resolutions: &[Resolution],
    ) -> Vec<LinkProposal<'a>> {
        if queries.len() != resolutions.len() {
            warn!(
                "propose_batch received {} queries but {} resolutions; only {} will be processed",
                queries.len(),
                resolutions.len(),
                queries.len().min(resolutions.len())
            );
        }
        queries
            .par_iter()
            .zip(resolutions.par_iter())
            .map(|(query, resolution)| {
                self.propose(&query.name, resolution, query.external_identifier.as_deref())
            })
            .collect()
    }

    pub fn find_best_match(&self, name: &str, identifier: Option<&str>) -> Option<MatchCandidate<'a>> {
        ranker::find_best_match(self.index, name, identifier, &self.match_config)
    }
}
