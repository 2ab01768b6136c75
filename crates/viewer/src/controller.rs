use catalog::{Catalog, Project, ProjectConfig, load_catalog};
use foundation::ParticipantId;
use gateway::Gateway;
use layout::{Grid, compute_grid};
use streaming::{DescriptorId, TileSourceDescriptor, TileUrlRegistry, UrlResolver};
use tracing::{debug, error, info, warn};

use crate::error::ViewerError;
use crate::navigation::{NavEntry, navigation_entries};
use crate::surface::Surface;

/// Lifecycle of the viewer.
///
/// Unloaded → Loading → Ready(first) → Ready(other) ... There is no teardown;
/// only a failed load falls back to `Unloaded` so it can be triggered again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerState {
    Unloaded,
    Loading,
    /// Loaded, but the project has no participants.
    Empty,
    Ready(ParticipantId),
}

/// Proof that a load was started; handed back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

/// Navigation controller.
///
/// Owns the project documents (loaded once), the tile-URL registry and the
/// derived grid of the active participant.
#[derive(Debug)]
pub struct Controller<S, R> {
    surface: S,
    resolver: R,
    state: ViewerState,
    load_generation: u64,
    pending_selection: Option<ParticipantId>,
    catalog: Option<Catalog>,
    registry: Option<TileUrlRegistry<R>>,
    grid: Option<Grid>,
    descriptors: Vec<TileSourceDescriptor>,
}

impl<S: Surface, R: UrlResolver + Clone> Controller<S, R> {
    pub fn new(surface: S, resolver: R) -> Self {
        Self {
            surface,
            resolver,
            state: ViewerState::Unloaded,
            load_generation: 0,
            pending_selection: None,
            catalog: None,
            registry: None,
            grid: None,
            descriptors: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn active_participant(&self) -> Option<&ParticipantId> {
        match &self.state {
            ViewerState::Ready(id) => Some(id),
            _ => None,
        }
    }

    /// Grid of the active participant; `None` before load or for a page-less participant.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn descriptors(&self) -> &[TileSourceDescriptor] {
        &self.descriptors
    }

    pub fn navigation(&self) -> Vec<NavEntry> {
        match &self.catalog {
            Some(catalog) => navigation_entries(catalog, self.active_participant()),
            None => Vec::new(),
        }
    }

    /// Tile URL for the rendering engine; `None` for unknown sources or levels.
    pub fn tile_url(&self, id: DescriptorId, level: u32, x: u32, y: u32) -> Option<String> {
        self.registry.as_ref()?.tile_url(id, level, x, y)
    }

    pub fn level_scale(&self, id: DescriptorId, level: u32) -> Option<f64> {
        self.registry.as_ref()?.level_scale(id, level)
    }

    /// Starts loading if nothing has been loaded yet.
    ///
    /// Returns `None` while a load is in flight or once loaded, which makes
    /// repeated and racing triggers harmless.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.state != ViewerState::Unloaded {
            debug!(state = ?self.state, "load already triggered");
            return None;
        }
        self.load_generation += 1;
        self.state = ViewerState::Loading;
        Some(LoadTicket {
            generation: self.load_generation,
        })
    }

    /// Applies the result of the load started by `ticket`.
    ///
    /// Results for a superseded ticket are discarded. On success the
    /// selection made while loading wins, otherwise the lowest participant id.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Catalog, ViewerError>,
    ) -> Result<(), ViewerError> {
        if self.state != ViewerState::Loading || ticket.generation != self.load_generation {
            warn!(
                ticket = ticket.generation,
                current = self.load_generation,
                "discarding stale load result"
            );
            return Ok(());
        }

        let catalog = match result {
            Ok(catalog) => catalog,
            Err(err) => {
                error!("error initializing viewer: {err}");
                self.state = ViewerState::Unloaded;
                self.surface.show_error(&err);
                return Err(err);
            }
        };

        self.registry = Some(TileUrlRegistry::new(
            self.resolver.clone(),
            catalog.project.tile_root(),
        ));
        self.surface.show_project_title(&catalog.roster.project_title);

        let pending = match self.pending_selection.take() {
            Some(id) if catalog.participant(&id).is_none() => {
                let err = ViewerError::UnknownParticipant { id };
                warn!("dropping selection made while loading: {err}");
                self.surface.show_error(&err);
                None
            }
            other => other,
        };
        let target = pending.or_else(|| catalog.metadata.first_participant().map(|p| p.id.clone()));
        self.catalog = Some(catalog);

        let Some(target) = target else {
            warn!("project has no participants");
            self.state = ViewerState::Empty;
            self.surface.show_navigation(&[]);
            return Ok(());
        };

        self.activate(target);
        Ok(())
    }

    /// Loads `project`'s documents through `gateway` and shows the first participant.
    pub async fn load(&mut self, gateway: &dyn Gateway, project: &Project) -> Result<(), ViewerError> {
        let Some(ticket) = self.begin_load() else {
            return Ok(());
        };
        info!(project = %project.id, "loading data for project");
        let result = load_catalog(gateway, project)
            .await
            .map_err(ViewerError::from_document);
        self.complete_load(ticket, result)
    }

    /// Reads the projects configuration at `config_path`, then loads its current project.
    pub async fn load_from_config(
        &mut self,
        gateway: &dyn Gateway,
        config_path: &str,
    ) -> Result<(), ViewerError> {
        let Some(ticket) = self.begin_load() else {
            return Ok(());
        };

        let result = async {
            let config = ProjectConfig::fetch(gateway, config_path)
                .await
                .map_err(ViewerError::from_config)?;
            let project = config
                .current_project()
                .map_err(ViewerError::from_config)?
                .clone();
            info!(project = %project.id, "loading data for project");
            load_catalog(gateway, &project)
                .await
                .map_err(ViewerError::from_document)
        }
        .await;

        self.complete_load(ticket, result)
    }

    /// Switches to participant `id`.
    ///
    /// Returns `Ok(true)` if the view was re-rendered. Selecting the active
    /// participant does nothing; a selection before load completes is
    /// remembered and applied when the documents arrive.
    pub fn select(&mut self, id: &ParticipantId) -> Result<bool, ViewerError> {
        match &self.state {
            ViewerState::Unloaded | ViewerState::Loading => {
                debug!(participant = %id, "queueing selection until load completes");
                self.pending_selection = Some(id.clone());
                Ok(false)
            }
            ViewerState::Ready(active) if active == id => Ok(false),
            ViewerState::Ready(_) | ViewerState::Empty => {
                let known = self
                    .catalog
                    .as_ref()
                    .is_some_and(|c| c.participant(id).is_some());
                if !known {
                    let err = ViewerError::UnknownParticipant { id: id.clone() };
                    warn!("{err}");
                    self.surface.show_error(&err);
                    return Err(err);
                }
                Ok(self.activate(id.clone()))
            }
        }
    }

    fn activate(&mut self, id: ParticipantId) -> bool {
        info!(participant = %id, "showing participant");
        self.state = ViewerState::Ready(id.clone());

        let entries = self.navigation();
        self.surface.show_navigation(&entries);
        self.surface.set_active_entry(&id);

        let Some(catalog) = self.catalog.as_ref() else {
            return false;
        };
        self.surface.show_team_name(&catalog.team(&id).fullname);

        self.surface.clear_tiles();
        self.descriptors.clear();
        self.grid = None;
        if let Some(registry) = self.registry.as_mut() {
            registry.clear();
        }

        let pages = catalog
            .participant(&id)
            .map(|p| p.pages.as_slice())
            .unwrap_or_default();
        let Some(grid) = compute_grid(pages) else {
            warn!("{}", ViewerError::NoPagesForParticipant { id });
            return false;
        };

        let Some(registry) = self.registry.as_mut() else {
            return false;
        };
        self.descriptors = registry.replace_with_grid(&id, &grid);
        for descriptor in &self.descriptors {
            self.surface.add_tiled_image(descriptor);
            debug!(
                id = descriptor.id.0,
                x = descriptor.x,
                y = descriptor.y,
                "page placed"
            );
        }
        self.surface.fit_bounds(grid.layout.bounds);
        self.grid = Some(grid);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{Controller, ViewerState};
    use crate::error::ViewerError;
    use crate::navigation::NavEntry;
    use crate::surface::Surface;
    use catalog::{Project, ProjectPaths};
    use foundation::{ParticipantId, Rect};
    use gateway::{BoxFuture, Gateway, GatewayCell, GatewayError, MemoryGateway, UrlResolver};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use streaming::{PrefixResolver, TileSourceDescriptor};

    #[derive(Debug, Default)]
    struct RecordingSurface {
        title: String,
        navigation: Vec<NavEntry>,
        active: Option<ParticipantId>,
        team_name: String,
        clears: usize,
        images: Vec<TileSourceDescriptor>,
        fits: Vec<Rect>,
        errors: Vec<String>,
    }

    impl Surface for RecordingSurface {
        fn show_project_title(&mut self, title: &str) {
            self.title = title.to_string();
        }
        fn show_navigation(&mut self, entries: &[NavEntry]) {
            self.navigation = entries.to_vec();
        }
        fn set_active_entry(&mut self, id: &ParticipantId) {
            self.active = Some(id.clone());
        }
        fn show_team_name(&mut self, name: &str) {
            self.team_name = name.to_string();
        }
        fn clear_tiles(&mut self) {
            self.clears += 1;
            self.images.clear();
        }
        fn add_tiled_image(&mut self, descriptor: &TileSourceDescriptor) {
            self.images.push(descriptor.clone());
        }
        fn fit_bounds(&mut self, bounds: Rect) {
            self.fits.push(bounds);
        }
        fn show_error(&mut self, error: &ViewerError) {
            self.errors.push(error.to_string());
        }
    }

    /// Counts document fetches on top of an in-memory store.
    struct CountingGateway {
        inner: MemoryGateway,
        fetches: AtomicUsize,
    }

    impl UrlResolver for CountingGateway {
        fn resolve_public_url(&self, path: &str) -> String {
            self.inner.resolve_public_url(path)
        }
    }

    impl Gateway for CountingGateway {
        fn fetch_bytes<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GatewayError>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_bytes(path)
        }
    }

    fn project() -> Project {
        Project {
            id: "demo".to_string(),
            paths: ProjectPaths {
                output_tiles: "demo/tiles".to_string(),
                teams_file: "demo/teams.json".to_string(),
            },
        }
    }

    async fn gateway() -> CountingGateway {
        let inner = MemoryGateway::new("https://cdn.example/public");
        inner
            .insert_json(
                "demo/tiles/metadata.json",
                &json!({"participants": {
                    "10": {"id": "10", "pages": [{"position": 1, "width": 600, "height": 800}]},
                    "3": {"id": "3", "pages": [
                        {"position": 12, "width": 2048, "height": 1024},
                        {"position": 7, "width": 1024, "height": 1024},
                        {"position": 7, "width": 9999, "height": 9999}
                    ]},
                    "4": {"id": "4", "pages": []}
                }}),
            )
            .await;
        inner
            .insert_json(
                "demo/teams.json",
                &json!({"project_title": "Spring Fair", "teams": {
                    "3": {"shortname": "Owls", "fullname": "Night Owls"},
                    "10": {"shortname": "Larks", "fullname": "Morning Larks"}
                }}),
            )
            .await;
        inner
            .insert_json(
                "projects-config.json",
                &json!({"projects": [{"id": "demo", "paths": {"outputTiles": "demo/tiles", "teamsFile": "demo/teams.json"}}], "defaultProject": "demo"}),
            )
            .await;
        CountingGateway {
            inner,
            fetches: AtomicUsize::new(0),
        }
    }

    fn controller() -> Controller<RecordingSurface, PrefixResolver> {
        Controller::new(
            RecordingSurface::default(),
            PrefixResolver::new("https://cdn.example/public"),
        )
    }

    #[tokio::test]
    async fn load_shows_lowest_participant() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();

        assert_eq!(c.state(), &ViewerState::Ready(ParticipantId::new("3")));
        let s = c.surface();
        assert_eq!(s.title, "Spring Fair");
        assert_eq!(s.team_name, "Night Owls");
        assert_eq!(s.active, Some(ParticipantId::new("3")));
        assert_eq!(s.images.len(), 2);
        assert_eq!(s.fits, vec![c.grid().unwrap().layout.bounds]);

        let labels: Vec<&str> = s.navigation.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["TN3", "TN4", "TN10"]);
        assert!(s.navigation[0].active);
    }

    #[tokio::test]
    async fn descriptors_resolve_to_tile_urls() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();

        let first = c.descriptors()[0].clone();
        assert_eq!(first.max_level, 1);
        assert_eq!(
            c.tile_url(first.id, 0, 0, 0).unwrap(),
            "https://cdn.example/public/demo/tiles/TN03_07_level_1_tile_0_0.png"
        );
        let second = c.descriptors()[1].clone();
        assert_eq!(
            c.tile_url(second.id, 2, 3, 1).unwrap(),
            "https://cdn.example/public/demo/tiles/TN03_012_level_0_tile_3_1.png"
        );
        assert_eq!(c.level_scale(second.id, 0), Some(0.25));
    }

    #[tokio::test]
    async fn repeated_load_is_a_no_op() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();
        let fetches = gw.fetches.load(Ordering::SeqCst);
        assert_eq!(fetches, 2);

        c.load(&gw, &project()).await.unwrap();
        c.load_from_config(&gw, "projects-config.json").await.unwrap();
        assert_eq!(gw.fetches.load(Ordering::SeqCst), fetches);
        assert!(c.begin_load().is_none());
    }

    #[tokio::test]
    async fn reselecting_active_participant_does_not_render() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();
        let clears = c.surface().clears;
        let fits = c.surface().fits.len();

        assert_eq!(c.select(&ParticipantId::new("3")).unwrap(), false);
        assert_eq!(c.surface().clears, clears);
        assert_eq!(c.surface().fits.len(), fits);
    }

    #[tokio::test]
    async fn switching_participants_replaces_tiles() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();
        let old_id = c.descriptors()[0].id;

        assert!(c.select(&ParticipantId::new("10")).unwrap());
        let s = c.surface();
        assert_eq!(s.images.len(), 1);
        assert_eq!(s.team_name, "Morning Larks");
        assert_eq!(s.active, Some(ParticipantId::new("10")));
        assert!(s.navigation.iter().find(|e| e.id.as_str() == "10").unwrap().active);
        assert_eq!(c.tile_url(old_id, 0, 0, 0), None);
        assert_eq!(c.grid().unwrap().layout.columns, 1);
    }

    #[tokio::test]
    async fn participant_without_pages_renders_nothing() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();
        let fits = c.surface().fits.len();

        assert_eq!(c.select(&ParticipantId::new("4")).unwrap(), false);
        assert_eq!(c.state(), &ViewerState::Ready(ParticipantId::new("4")));
        assert!(c.grid().is_none());
        assert!(c.descriptors().is_empty());
        assert!(c.surface().images.is_empty());
        assert_eq!(c.surface().fits.len(), fits);
        assert_eq!(c.surface().team_name, "");
    }

    #[tokio::test]
    async fn unknown_participant_is_reported() {
        let gw = gateway().await;
        let mut c = controller();
        c.load(&gw, &project()).await.unwrap();

        let err = c.select(&ParticipantId::new("99")).unwrap_err();
        assert!(matches!(err, ViewerError::UnknownParticipant { .. }));
        assert_eq!(c.state(), &ViewerState::Ready(ParticipantId::new("3")));
        assert_eq!(c.surface().errors.len(), 1);
    }

    #[tokio::test]
    async fn selection_during_load_wins_over_default() {
        let gw = gateway().await;
        let mut c = controller();

        let ticket = c.begin_load().unwrap();
        assert_eq!(c.select(&ParticipantId::new("10")).unwrap(), false);
        let catalog = catalog::load_catalog(&gw, &project()).await.unwrap();
        c.complete_load(ticket, Ok(catalog)).unwrap();

        assert_eq!(c.state(), &ViewerState::Ready(ParticipantId::new("10")));
    }

    #[tokio::test]
    async fn unknown_selection_during_load_is_reported() {
        let gw = gateway().await;
        let mut c = controller();

        let ticket = c.begin_load().unwrap();
        assert_eq!(c.select(&ParticipantId::new("99")).unwrap(), false);
        let catalog = catalog::load_catalog(&gw, &project()).await.unwrap();
        c.complete_load(ticket, Ok(catalog)).unwrap();

        assert_eq!(c.state(), &ViewerState::Ready(ParticipantId::new("3")));
        assert_eq!(c.surface().errors, vec!["unknown participant 99".to_string()]);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let gw = gateway().await;
        let mut c = controller();

        let ticket = c.begin_load().unwrap();
        let catalog = catalog::load_catalog(&gw, &project()).await.unwrap();
        c.complete_load(ticket, Ok(catalog.clone())).unwrap();
        c.select(&ParticipantId::new("10")).unwrap();
        let clears = c.surface().clears;

        c.complete_load(ticket, Ok(catalog)).unwrap();
        assert_eq!(c.state(), &ViewerState::Ready(ParticipantId::new("10")));
        assert_eq!(c.surface().clears, clears);
    }

    #[tokio::test]
    async fn failed_load_can_be_retried() {
        let gw = gateway().await;
        gw.inner.remove("demo/teams.json").await;
        let mut c = controller();

        let err = c.load(&gw, &project()).await.unwrap_err();
        assert!(matches!(err, ViewerError::DocumentFetch { ref path, .. } if path == "demo/teams.json"));
        assert_eq!(c.state(), &ViewerState::Unloaded);
        assert_eq!(c.surface().errors.len(), 1);

        gw.inner
            .insert_json("demo/teams.json", &json!({"project_title": "Again", "teams": {}}))
            .await;
        c.load(&gw, &project()).await.unwrap();
        assert_eq!(c.surface().title, "Again");
        assert_eq!(c.surface().team_name, "");
    }

    #[tokio::test]
    async fn loads_through_project_config() {
        let gw = gateway().await;
        let mut c = controller();
        c.load_from_config(&gw, "projects-config.json").await.unwrap();
        assert_eq!(c.catalog().unwrap().project.id, "demo");
        assert_eq!(c.active_participant(), Some(&ParticipantId::new("3")));
    }

    #[tokio::test]
    async fn missing_default_project_is_reported() {
        let gw = gateway().await;
        gw.inner
            .insert_json(
                "projects-config.json",
                &json!({"projects": [], "defaultProject": "demo"}),
            )
            .await;
        let mut c = controller();
        let err = c.load_from_config(&gw, "projects-config.json").await.unwrap_err();
        assert!(matches!(err, ViewerError::NoProjectFound { .. }));
    }

    #[tokio::test]
    async fn uninitialized_gateway_fails_soft() {
        let cell = Arc::new(GatewayCell::new());
        let mut c = Controller::new(RecordingSurface::default(), cell.clone());

        let err = c.load(&*cell, &project()).await.unwrap_err();
        assert!(matches!(err, ViewerError::GatewayNotReady));

        // Documents from elsewhere, gateway still not ready: URLs degrade to empty.
        let gw = gateway().await;
        let ticket = c.begin_load().unwrap();
        let catalog = catalog::load_catalog(&gw, &project()).await.unwrap();
        c.complete_load(ticket, Ok(catalog)).unwrap();
        let id = c.descriptors()[0].id;
        assert_eq!(c.tile_url(id, 0, 0, 0), Some(String::new()));
    }
}
