//! In-memory scene and solver doubles for unit tests.

use crate::scene::{NetworkObjects, SceneCollaborator};
use engine_core::{Drawable, Tint, Transform, Vec3, World};
use renderer::ObjectId;
use solver::{NetworkSnapshot, SolverJob, SolverReply, SolverTransport, Ticket};
use std::collections::{HashMap, VecDeque};

/// Records every scene call. Object ids come from a private `hecs` world.
#[derive(Default)]
pub struct FakeScene {
    ids: World,
    pub added: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
    pub visibility: HashMap<ObjectId, bool>,
    pub transforms: HashMap<ObjectId, Transform>,
    pub intensities: HashMap<ObjectId, f32>,
    pub line_updates: Vec<(ObjectId, Vec<Vec3>)>,
    pub rebuilds: Vec<NetworkSnapshot>,
}

impl FakeScene {
    pub fn last_line_points(&self) -> Option<&Vec<Vec3>> {
        self.line_updates.last().map(|(_, points)| points)
    }

    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.visibility.get(&id).copied().unwrap_or(true)
    }
}

impl SceneCollaborator for FakeScene {
    fn add_to_scene(&mut self, _drawable: Drawable, transform: Transform, tint: Tint) -> ObjectId {
        let id = self.ids.spawn(());
        self.added.push(id);
        self.transforms.insert(id, transform);
        self.intensities.insert(id, tint.intensity);
        id
    }

    fn remove_from_scene(&mut self, objects: &[ObjectId]) {
        self.removed.extend_from_slice(objects);
    }

    fn set_visible(&mut self, objects: &[ObjectId], visible: bool) {
        for &id in objects {
            self.visibility.insert(id, visible);
        }
    }

    fn rebuild_network(&mut self, snapshot: &NetworkSnapshot) -> NetworkObjects {
        self.rebuilds.push(snapshot.clone());
        let mut objects = NetworkObjects::default();
        for _ in snapshot.nodes.iter().filter(|n| !n.is_endpoint()) {
            objects.satellites.push(self.ids.spawn(()));
        }
        for edge in &snapshot.edges {
            objects.connections.push(self.ids.spawn(()));
            if edge.is_solution_path {
                objects.solution_path.push(self.ids.spawn(()));
            }
        }
        objects
    }

    fn set_transform(&mut self, object: ObjectId, transform: Transform) {
        self.transforms.insert(object, transform);
    }

    fn set_intensity(&mut self, object: ObjectId, intensity: f32) {
        self.intensities.insert(object, intensity);
    }

    fn set_line_points(&mut self, object: ObjectId, points: Vec<Vec3>) {
        self.line_updates.push((object, points));
    }
}

/// Records submitted jobs and hands back queued replies on `poll`.
#[derive(Default)]
pub struct FakeSolver {
    pub sent: Vec<(Ticket, SolverJob)>,
    pub queued: VecDeque<SolverReply>,
}

impl FakeSolver {
    /// Queue a reply to the `nth` submitted job.
    pub fn answer(&mut self, nth: usize, result: Result<NetworkSnapshot, solver::SolverError>) {
        if let Some((ticket, job)) = self.sent.get(nth) {
            self.queued.push_back(SolverReply {
                ticket: *ticket,
                kind: job.kind(),
                result,
            });
        }
    }

    /// Queue a reply to the most recent job.
    pub fn answer_last(&mut self, result: Result<NetworkSnapshot, solver::SolverError>) {
        if let Some(last) = self.sent.len().checked_sub(1) {
            self.answer(last, result);
        }
    }

    pub fn resolve_count(&self) -> usize {
        self.sent
            .iter()
            .filter(|(_, job)| matches!(job, SolverJob::Resolve(_)))
            .count()
    }
}

impl SolverTransport for FakeSolver {
    fn submit(&mut self, ticket: Ticket, job: SolverJob) {
        self.sent.push((ticket, job));
    }

    fn poll(&mut self) -> Vec<SolverReply> {
        self.queued.drain(..).collect()
    }
}
