//! JSON wire format of the generator and solver endpoints.

use crate::SolverError;
use glam::Vec3;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// Node name tagging the route's start terminal.
pub const START_NODE: &str = "START";
/// Node name tagging the route's end terminal.
pub const END_NODE: &str = "END";

/// A satellite or route terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(rename = "pos")]
    pub position: [f32; 3],
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// True for the START and END terminals.
    pub fn is_endpoint(&self) -> bool {
        self.name == START_NODE || self.name == END_NODE
    }
}

/// A visibility link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EdgeWire")]
pub struct EdgeRecord {
    pub a: NodeRecord,
    pub b: NodeRecord,
    pub is_solution_path: bool,
}

#[derive(Debug, Default, Deserialize)]
struct EdgeAttributes {
    #[serde(default)]
    is_solution_path: bool,
}

/// Accepted edge encodings. The service emits `[a, b, weight, {attrs}]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeWire {
    Weighted(NodeRecord, NodeRecord, IgnoredAny, EdgeAttributes),
    Plain(NodeRecord, NodeRecord, EdgeAttributes),
    Object {
        a: NodeRecord,
        b: NodeRecord,
        #[serde(default)]
        is_solution_path: bool,
    },
}

impl From<EdgeWire> for EdgeRecord {
    fn from(wire: EdgeWire) -> Self {
        match wire {
            EdgeWire::Weighted(a, b, _, attrs) | EdgeWire::Plain(a, b, attrs) => Self {
                a,
                b,
                is_solution_path: attrs.is_solution_path,
            },
            EdgeWire::Object {
                a,
                b,
                is_solution_path,
            } => Self {
                a,
                b,
                is_solution_path,
            },
        }
    }
}

/// Full node/edge description of the relay graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl NetworkSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Body of a resolve request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveRequest {
    #[serde(rename = "planetRadius")]
    pub planet_radius: f32,
    pub satellites: Vec<NodeRecord>,
}

/// Body returned by both service endpoints: a network, or an error marker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkReply {
    #[serde(default)]
    pub parse_error: bool,
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    #[serde(default)]
    pub nodes: Option<Vec<NodeRecord>>,
    #[serde(default)]
    pub edges: Option<Vec<EdgeRecord>>,
}

impl NetworkReply {
    /// Both `nodes` and `edges` must be present for the reply to count as a network.
    pub fn into_snapshot(self) -> Result<NetworkSnapshot, SolverError> {
        if self.parse_error {
            return Err(SolverError::Rejected(
                self.message.unwrap_or_else(|| "parse error".to_string()),
            ));
        }
        match (self.nodes, self.edges) {
            (Some(nodes), Some(edges)) => Ok(NetworkSnapshot { nodes, edges }),
            _ => Err(match self.message {
                Some(message) => SolverError::Rejected(message),
                None => SolverError::MissingNetwork,
            }),
        }
    }
}

/// Decode a service body into the network it carries.
pub fn decode_reply(body: &str) -> Result<NetworkSnapshot, SolverError> {
    serde_json::from_str::<NetworkReply>(body)?.into_snapshot()
}

/// Regular polyhedron layouts the generator knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polyhedron {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl Polyhedron {
    pub const ALL: [Polyhedron; 5] = [
        Polyhedron::Tetrahedron,
        Polyhedron::Cube,
        Polyhedron::Octahedron,
        Polyhedron::Dodecahedron,
        Polyhedron::Icosahedron,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Polyhedron::Tetrahedron => "tetrahedron",
            Polyhedron::Cube => "cube",
            Polyhedron::Octahedron => "octahedron",
            Polyhedron::Dodecahedron => "dodecahedron",
            Polyhedron::Icosahedron => "icosahedron",
        }
    }
}

/// Query of the generation endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateRequest {
    Random {
        satellite_count: u32,
        min_altitude: f32,
        max_altitude: f32,
        planet_radius: f32,
        start: Vec3,
        end: Vec3,
    },
    Polyhedron {
        polyhedron: Polyhedron,
        altitude: f32,
        planet_radius: f32,
        start: Vec3,
        end: Vec3,
    },
}

impl GenerateRequest {
    /// Query-string pairs; points are encoded as `x,y,z`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            GenerateRequest::Random {
                satellite_count,
                min_altitude,
                max_altitude,
                planet_radius,
                start,
                end,
            } => vec![
                ("satelliteCount", satellite_count.to_string()),
                ("minAltitude", min_altitude.to_string()),
                ("maxAltitude", max_altitude.to_string()),
                ("planetRadius", planet_radius.to_string()),
                ("start", encode_point(*start)),
                ("end", encode_point(*end)),
            ],
            GenerateRequest::Polyhedron {
                polyhedron,
                altitude,
                planet_radius,
                start,
                end,
            } => vec![
                ("polyhedron", polyhedron.as_str().to_string()),
                ("altitude", altitude.to_string()),
                ("planetRadius", planet_radius.to_string()),
                ("start", encode_point(*start)),
                ("end", encode_point(*end)),
            ],
        }
    }
}

fn encode_point(p: Vec3) -> String {
    format!("{},{},{}", p.x, p.y, p.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_decodes_service_edge_arrays() {
        let json = r#"{
            "nodes": [
                {"name": "START", "pos": [1.0, 2.0, 3.0]},
                {"name": "0", "pos": [4.0, 5.0, 6.0]}
            ],
            "edges": [
                [{"name": "START", "pos": [1.0, 2.0, 3.0]},
                 {"name": "0", "pos": [4.0, 5.0, 6.0]},
                 12.5,
                 {"is_solution_path": true}]
            ]
        }"#;
        let snap: NetworkSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.nodes.len(), 2);
        assert_eq!(snap.edges.len(), 1);
        assert!(snap.edges[0].is_solution_path);
        assert_eq!(snap.edges[0].b.position(), Vec3::new(4.0, 5.0, 6.0));
        assert!(snap.nodes[0].is_endpoint());
    }

    #[test]
    fn edge_accepts_three_element_and_object_forms() {
        let three = r#"[{"name": "a", "pos": [0,0,0]}, {"name": "b", "pos": [1,0,0]}, {}]"#;
        let edge: EdgeRecord = serde_json::from_str(three).unwrap();
        assert!(!edge.is_solution_path);

        let object = r#"{"a": {"name": "a", "pos": [0,0,0]},
                         "b": {"name": "b", "pos": [1,0,0]},
                         "is_solution_path": true}"#;
        let edge: EdgeRecord = serde_json::from_str(object).unwrap();
        assert!(edge.is_solution_path);
        assert_eq!(edge.b.name, "b");
    }

    #[test]
    fn resolve_request_uses_service_field_names() {
        let req = ResolveRequest {
            planet_radius: 6371.0,
            satellites: vec![NodeRecord::new(START_NODE, Vec3::new(1.0, 0.0, 0.0))],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["planetRadius"], 6371.0);
        assert_eq!(value["satellites"][0]["name"], "START");
        assert_eq!(value["satellites"][0]["pos"][0], 1.0);
    }

    #[test]
    fn parse_error_reply_is_rejected() {
        match decode_reply(r#"{"parse_error": true, "message": "bad json"}"#) {
            Err(SolverError::Rejected(msg)) => assert_eq!(msg, "bad json"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn plain_reply_becomes_snapshot() {
        let snap =
            decode_reply(r#"{"nodes": [{"name": "END", "pos": [0,0,1]}], "edges": []}"#).unwrap();
        assert_eq!(snap.nodes[0].name, END_NODE);
    }

    #[test]
    fn error_objects_are_not_networks() {
        match decode_reply(r#"{"error": "generator crashed"}"#) {
            Err(SolverError::Rejected(msg)) => assert_eq!(msg, "generator crashed"),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(matches!(
            decode_reply(r#"{"parse_error": false}"#),
            Err(SolverError::MissingNetwork)
        ));
        assert!(matches!(
            decode_reply(r#"{"nodes": []}"#),
            Err(SolverError::MissingNetwork)
        ));
        assert!(serde_json::from_str::<NetworkSnapshot>("{}").is_err());
    }

    #[test]
    fn empty_network_is_still_a_network() {
        let snap = decode_reply(r#"{"nodes": [], "edges": []}"#).unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn polyhedron_query_names_shape() {
        let req = GenerateRequest::Polyhedron {
            polyhedron: Polyhedron::Icosahedron,
            altitude: 1000.0,
            planet_radius: 6371.0,
            start: Vec3::new(1.0, 2.0, 3.0),
            end: Vec3::ZERO,
        };
        let pairs = req.query_pairs();
        assert!(pairs.contains(&("polyhedron", "icosahedron".to_string())));
        assert!(pairs.contains(&("start", "1,2,3".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "satelliteCount"));
    }
}
