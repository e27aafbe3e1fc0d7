//! Keeps the displayed network in step with the solver service.

use crate::controls::DisplayToggles;
use crate::endpoints::{index, EndpointId, EndpointStore};
use crate::scene::{NetworkObjects, SceneCollaborator};
use solver::{
    GenerateRequest, JobKind, NetworkSnapshot, NodeRecord, ResolveRequest, SolverError, SolverJob,
    SolverReply, SolverTransport, Ticket,
};

/// What happened to one reply.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The display now shows this reply's network.
    Applied {
        kind: JobKind,
        nodes: usize,
        edges: usize,
    },
    /// The service could not parse the request; display unchanged.
    Rejected(String),
    /// Transport or decoding failure; display unchanged.
    Failed(String),
    /// Superseded by a newer request or drag; dropped.
    Stale { ticket: Ticket, latest: Ticket },
}

/// Issues generate / resolve requests and rebuilds the network from replies.
///
/// Every request takes the next ticket. Only a reply carrying the latest
/// ticket is applied; local interaction never invalidates a reply.
#[derive(Debug, Default)]
pub struct SyncCoordinator {
    snapshot: NetworkSnapshot,
    objects: NetworkObjects,
    latest: Ticket,
}

impl SyncCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Network currently on display.
    pub fn snapshot(&self) -> &NetworkSnapshot {
        &self.snapshot
    }

    #[cfg(test)]
    pub fn objects(&self) -> &NetworkObjects {
        &self.objects
    }

    pub fn latest_ticket(&self) -> Ticket {
        self.latest
    }

    fn next_ticket(&mut self) -> Ticket {
        self.latest += 1;
        self.latest
    }

    /// Current nodes with the live START / END positions substituted.
    ///
    /// Terminals missing from the snapshot are appended.
    pub fn resolve_request(&self, endpoints: &EndpointStore, planet_radius: f32) -> ResolveRequest {
        let mut seen = [false; 2];
        let mut satellites: Vec<NodeRecord> = self
            .snapshot
            .nodes
            .iter()
            .map(|node| match EndpointId::from_node_name(&node.name) {
                Some(id) => {
                    seen[index(id)] = true;
                    NodeRecord::new(node.name.clone(), endpoints.position(id))
                }
                None => node.clone(),
            })
            .collect();
        for id in EndpointId::ALL {
            if !seen[index(id)] {
                satellites.push(NodeRecord::new(id.node_name(), endpoints.position(id)));
            }
        }
        ResolveRequest {
            planet_radius,
            satellites,
        }
    }

    pub fn request_resolve(
        &mut self,
        endpoints: &EndpointStore,
        planet_radius: f32,
        transport: &mut dyn SolverTransport,
    ) -> Ticket {
        let request = self.resolve_request(endpoints, planet_radius);
        let ticket = self.next_ticket();
        log::info!(
            "Resolve request #{} with {} nodes",
            ticket,
            request.satellites.len()
        );
        transport.submit(ticket, SolverJob::Resolve(request));
        ticket
    }

    pub fn request_generate(
        &mut self,
        request: GenerateRequest,
        transport: &mut dyn SolverTransport,
    ) -> Ticket {
        let ticket = self.next_ticket();
        log::info!("Generate request #{}: {:?}", ticket, request);
        transport.submit(ticket, SolverJob::Generate(request));
        ticket
    }

    /// Drain the transport and apply each reply in arrival order.
    pub fn pump(
        &mut self,
        transport: &mut dyn SolverTransport,
        scene: &mut dyn SceneCollaborator,
        toggles: &DisplayToggles,
    ) -> Vec<SyncOutcome> {
        transport
            .poll()
            .into_iter()
            .map(|reply| self.apply(reply, scene, toggles))
            .collect()
    }

    pub fn apply(
        &mut self,
        reply: SolverReply,
        scene: &mut dyn SceneCollaborator,
        toggles: &DisplayToggles,
    ) -> SyncOutcome {
        if reply.ticket != self.latest {
            log::warn!(
                "Dropping stale {} reply #{} (latest is #{})",
                reply.kind,
                reply.ticket,
                self.latest
            );
            return SyncOutcome::Stale {
                ticket: reply.ticket,
                latest: self.latest,
            };
        }

        match reply.result {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    log::warn!("{} #{} returned an empty network", reply.kind, reply.ticket);
                }
                scene.remove_from_scene(&self.objects.all());
                self.objects = scene.rebuild_network(&snapshot);
                self.apply_visibility(scene, toggles);
                let outcome = SyncOutcome::Applied {
                    kind: reply.kind,
                    nodes: snapshot.nodes.len(),
                    edges: snapshot.edges.len(),
                };
                log::info!(
                    "Network loaded from {} #{}: {} nodes, {} edges",
                    reply.kind,
                    reply.ticket,
                    snapshot.nodes.len(),
                    snapshot.edges.len()
                );
                self.snapshot = snapshot;
                outcome
            }
            Err(SolverError::Rejected(message)) => {
                log::error!("Solver rejected {} #{}: {}", reply.kind, reply.ticket, message);
                SyncOutcome::Rejected(message)
            }
            Err(e) => {
                log::error!("{} #{} failed: {}", reply.kind, reply.ticket, e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }

    /// Show or hide network objects from the operator's toggles.
    pub fn apply_visibility(&self, scene: &mut dyn SceneCollaborator, toggles: &DisplayToggles) {
        scene.set_visible(&self.objects.satellites, toggles.satellites);
        scene.set_visible(&self.objects.connections, toggles.connections);
        scene.set_visible(&self.objects.solution_path, toggles.solution_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::PlanetSurface;
    use crate::testing::{FakeScene, FakeSolver};
    use engine_core::Vec3;
    use solver::{EdgeRecord, END_NODE, START_NODE};

    const R: f32 = 6371.0;

    fn endpoints() -> EndpointStore {
        EndpointStore::new(
            PlanetSurface::new(R, 0.0),
            Vec3::new(R, 0.0, 0.0),
            Vec3::new(0.0, R, 0.0),
            75.0,
        )
    }

    fn network() -> NetworkSnapshot {
        let start = NodeRecord::new(START_NODE, Vec3::new(1.0, 1.0, 1.0));
        let sat = NodeRecord::new("0", Vec3::new(7000.0, 0.0, 0.0));
        let end = NodeRecord::new(END_NODE, Vec3::new(2.0, 2.0, 2.0));
        NetworkSnapshot {
            nodes: vec![start.clone(), sat.clone(), end],
            edges: vec![EdgeRecord {
                a: start,
                b: sat,
                is_solution_path: true,
            }],
        }
    }

    fn loaded(scene: &mut FakeScene, solver: &mut FakeSolver) -> SyncCoordinator {
        let mut sync = SyncCoordinator::new();
        sync.request_resolve(&endpoints(), R, solver);
        solver.answer_last(Ok(network()));
        sync.pump(solver, scene, &DisplayToggles::default());
        sync
    }

    #[test]
    fn serialization_substitutes_live_endpoints() {
        let mut scene = FakeScene::default();
        let mut solver = FakeSolver::default();
        let sync = loaded(&mut scene, &mut solver);

        let request = sync.resolve_request(&endpoints(), 3000.0);
        assert_eq!(request.planet_radius, 3000.0);
        assert_eq!(request.satellites.len(), 3);
        assert_eq!(request.satellites[0].position(), Vec3::new(R, 0.0, 0.0));
        assert_eq!(request.satellites[1].position(), Vec3::new(7000.0, 0.0, 0.0));
        assert_eq!(request.satellites[2].position(), Vec3::new(0.0, R, 0.0));
    }

    #[test]
    fn empty_network_still_sends_both_endpoints() {
        let request = SyncCoordinator::new().resolve_request(&endpoints(), R);
        let names: Vec<_> = request.satellites.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec![START_NODE, END_NODE]);
    }

    #[test]
    fn missing_terminal_is_appended_after_known_nodes() {
        let mut scene = FakeScene::default();
        let mut solver = FakeSolver::default();
        let mut sync = SyncCoordinator::new();
        sync.request_generate(
            GenerateRequest::Random {
                satellite_count: 1,
                min_altitude: 300.0,
                max_altitude: 700.0,
                planet_radius: R,
                start: Vec3::X,
                end: Vec3::Y,
            },
            &mut solver,
        );
        solver.answer_last(Ok(NetworkSnapshot {
            nodes: vec![
                NodeRecord::new("7", Vec3::new(0.0, 0.0, 7000.0)),
                NodeRecord::new(END_NODE, Vec3::ZERO),
            ],
            edges: Vec::new(),
        }));
        sync.pump(&mut solver, &mut scene, &DisplayToggles::default());

        let request = sync.resolve_request(&endpoints(), R);
        let names: Vec<_> = request.satellites.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["7", END_NODE, START_NODE]);
        assert_eq!(request.satellites[1].position(), Vec3::new(0.0, R, 0.0));
        assert_eq!(request.satellites[2].position(), Vec3::new(R, 0.0, 0.0));
    }

    #[test]
    fn applied_reply_replaces_network_and_respects_toggles() {
        let mut scene = FakeScene::default();
        let mut solver = FakeSolver::default();
        let mut sync = loaded(&mut scene, &mut solver);
        let first = sync.objects().clone();
        assert_eq!(first.satellites.len(), 1);

        let toggles = DisplayToggles {
            connections: false,
            ..Default::default()
        };
        sync.request_resolve(&endpoints(), R, &mut solver);
        solver.answer_last(Ok(network()));
        let outcomes = sync.pump(&mut solver, &mut scene, &toggles);

        assert!(matches!(outcomes[0], SyncOutcome::Applied { nodes: 3, edges: 1, .. }));
        assert_eq!(scene.rebuilds.len(), 2);
        assert!(first.all().iter().all(|id| scene.removed.contains(id)));
        let second = sync.objects();
        assert!(!scene.is_visible(second.connections[0]));
        assert!(scene.is_visible(second.solution_path[0]));
    }

    #[test]
    fn parse_error_keeps_display() {
        let mut scene = FakeScene::default();
        let mut solver = FakeSolver::default();
        let mut sync = loaded(&mut scene, &mut solver);
        let before = sync.snapshot().clone();

        sync.request_resolve(&endpoints(), R, &mut solver);
        solver.answer_last(Err(SolverError::Rejected("bad body".into())));
        let outcomes = sync.pump(&mut solver, &mut scene, &DisplayToggles::default());

        assert_eq!(outcomes, vec![SyncOutcome::Rejected("bad body".into())]);
        assert_eq!(sync.snapshot(), &before);
        assert_eq!(scene.rebuilds.len(), 1);
        assert!(scene.removed.is_empty());
    }

    #[test]
    fn transport_failure_keeps_display() {
        let mut scene = FakeScene::default();
        let mut solver = FakeSolver::default();
        let mut sync = loaded(&mut scene, &mut solver);

        sync.request_resolve(&endpoints(), R, &mut solver);
        solver.answer_last(Err(SolverError::Status(500)));
        let outcomes = sync.pump(&mut solver, &mut scene, &DisplayToggles::default());
        assert!(matches!(outcomes[0], SyncOutcome::Failed(_)));
        assert_eq!(scene.rebuilds.len(), 1);
    }

    #[test]
    fn reply_older_than_latest_request_is_dropped() {
        let mut scene = FakeScene::default();
        let mut solver = FakeSolver::default();
        let mut sync = SyncCoordinator::new();

        let first = sync.request_resolve(&endpoints(), R, &mut solver);
        let second = sync.request_resolve(&endpoints(), R, &mut solver);
        let reply = |ticket| SolverReply {
            ticket,
            kind: JobKind::Resolve,
            result: Ok(network()),
        };
        solver.queued.push_back(reply(second));
        solver.queued.push_back(reply(first));

        let outcomes = sync.pump(&mut solver, &mut scene, &DisplayToggles::default());
        assert!(matches!(outcomes[0], SyncOutcome::Applied { .. }));
        assert_eq!(
            outcomes[1],
            SyncOutcome::Stale {
                ticket: first,
                latest: second
            }
        );
        assert_eq!(scene.rebuilds.len(), 1);
    }

    #[test]
    fn generate_goes_through_same_ticketing() {
        let mut solver = FakeSolver::default();
        let mut sync = SyncCoordinator::new();
        let request = GenerateRequest::Random {
            satellite_count: 5,
            min_altitude: 300.0,
            max_altitude: 700.0,
            planet_radius: R,
            start: Vec3::X,
            end: Vec3::Y,
        };
        let t = sync.request_generate(request.clone(), &mut solver);
        assert_eq!(t, sync.latest_ticket());
        assert_eq!(solver.sent, vec![(t, SolverJob::Generate(request))]);
    }
}
