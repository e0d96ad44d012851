//! Catalog-backed session for one command

use anyhow::{Context, Result};
use clap::ArgMatches;
use ldex_model::{Collection, CollectionId, EntryId, StatusPatch, Universe, UserId};
use ldex_projector::{
    BoxView, CollectionProjector, CollectionStats, Page, PageRequest, ProjectorConfig,
};
use ldex_store::{
    invalid_placements, placement_conflicts, CatalogFile, CollectionDirectory, EntryCatalog,
    MemoryStore, StoreError, StoreHandle,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Catalog and universe selection shared by the view commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UniverseArgs {
    pub(crate) catalog: PathBuf,
    pub(crate) region: Option<String>,
    pub(crate) variants: bool,
    pub(crate) ledger: Option<PathBuf>,
}

impl UniverseArgs {
    pub(crate) fn from_matches(args: &ArgMatches) -> Result<Self> {
        Ok(Self {
            catalog: args
                .get_one::<PathBuf>("catalog")
                .cloned()
                .context("--catalog is required")?,
            region: args.get_one::<String>("region").cloned(),
            variants: args.get_flag("variants"),
            ledger: args.get_one::<PathBuf>("ledger").cloned(),
        })
    }

    pub(crate) fn universe(&self) -> Universe {
        match &self.region {
            Some(region) => Universe::regional(region.clone()),
            None if self.variants => Universe::national_with_variants(),
            None => Universe::national(),
        }
    }
}

/// One ledger file row: the entry plus the fields to set
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct LedgerRow {
    entry_id: EntryId,
    #[serde(flatten)]
    patch: StatusPatch,
}

fn read_ledger(path: &Path) -> Result<Vec<LedgerRow>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading ledger {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing ledger {}", path.display()))
}

fn open_store(path: &Path) -> Result<Arc<MemoryStore>> {
    let file = CatalogFile::read(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let store = MemoryStore::from_catalog_file(file)
        .with_context(|| format!("loading catalog {}", path.display()))?;
    Ok(Arc::new(store))
}

/// A throwaway user and collection over a loaded catalog
pub(crate) struct Session {
    projector: CollectionProjector,
    user: UserId,
    collection: CollectionId,
}

impl Session {
    pub(crate) async fn open(args: &UniverseArgs, config: ProjectorConfig) -> Result<Self> {
        let store = open_store(&args.catalog)?;

        if let Some(region) = &args.region {
            if store.regional_dex(region).await?.is_none() {
                tracing::warn!(region = %region, "no regional dex by that name, universe is empty");
            }
        }

        let user = UserId::new();
        let collection = store
            .create(Collection::new(user, "ldex", args.universe())?)
            .await?
            .id;
        let projector = CollectionProjector::new(StoreHandle::from_backend(store), config);
        let session = Self {
            projector,
            user,
            collection,
        };

        if let Some(path) = &args.ledger {
            let rows = read_ledger(path)?;
            for row in &rows {
                session
                    .projector
                    .set_status(session.collection, user, row.entry_id, &row.patch)
                    .await
                    .with_context(|| format!("applying ledger row for entry {}", row.entry_id))?;
            }
            tracing::info!(rows = rows.len(), "ledger applied");
        }

        Ok(session)
    }

    pub(crate) async fn box_view(&self, number: u32) -> Result<BoxView> {
        Ok(self.projector.box_view(self.collection, self.user, number).await?)
    }

    pub(crate) async fn page(&self, request: &PageRequest) -> Result<Page> {
        Ok(self.projector.page(self.collection, self.user, request).await?)
    }

    pub(crate) async fn stats(&self) -> Result<CollectionStats> {
        Ok(self.projector.stats(self.collection, self.user).await?)
    }
}

/// Every data-integrity finding in a catalog, as printable lines
///
/// Placement tables are checked first; when they are sound, each universe
/// the catalog defines is projected and its report collected.
pub(crate) async fn validate(path: &Path, config: ProjectorConfig) -> Result<Vec<String>> {
    let file = CatalogFile::read(path).with_context(|| format!("reading catalog {}", path.display()))?;

    let mut findings: Vec<String> = invalid_placements(&file.entries)
        .into_iter()
        .map(|(entry, source)| StoreError::InvalidPlacement { entry, source }.to_string())
        .collect();
    findings.extend(
        placement_conflicts(&file.entries)
            .into_iter()
            .map(|conflict| StoreError::from(conflict).to_string()),
    );
    if !findings.is_empty() {
        return Ok(findings);
    }

    let store = match MemoryStore::from_catalog_file(file) {
        Ok(store) => Arc::new(store),
        Err(err) if err.is_data_integrity() => return Ok(vec![err.to_string()]),
        Err(err) => return Err(err.into()),
    };

    let mut universes = vec![Universe::national(), Universe::national_with_variants()];
    universes.extend(
        store
            .regional_dexes()
            .await?
            .into_iter()
            .map(|dex| Universe::regional(dex.name)),
    );

    let user = UserId::new();
    let projector = CollectionProjector::new(StoreHandle::from_backend(store.clone()), config);
    for universe in universes {
        let collection = store
            .create(Collection::new(user, "validate", universe.clone())?)
            .await?;
        let projection = projector.project(collection.id, user).await?;
        findings.extend(
            projection
                .report
                .issues
                .iter()
                .map(|issue| format!("{universe}: {issue}")),
        );
    }

    Ok(findings)
}
