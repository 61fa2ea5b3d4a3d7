//! Overview export: a diagnostic dump of a document's element graph.
//!
//! Produces either plain text or JSON. Neither is ADM XML; both list every
//! element with its properties and outgoing references.
//!
//! ```text
//! APR_1001 (audioProgrammeName=Show, start=00:00:00.00000)
//!   audioContentIDRef ACO_1001
//! ```

use std::io::Write;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::Document;
use crate::elements::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, DocumentElement, ReferenceExt,
};
use crate::store::{PropertyEntry, PropertyStore};
use crate::Result;

/// One outgoing reference, named after its ADM XML reference attribute.
struct Edge {
    relation: &'static str,
    target: String,
}

fn edges_to<T: DocumentElement>(relation: &'static str, targets: Vec<Arc<T>>) -> Vec<Edge> {
    targets
        .iter()
        .map(|t| Edge { relation, target: t.id().to_string() })
        .collect()
}

fn edge_to<T: DocumentElement>(relation: &'static str, target: Option<Arc<T>>) -> Vec<Edge> {
    edges_to(relation, target.into_iter().collect())
}

trait Outline: DocumentElement + std::fmt::Display {
    fn edges(&self) -> Vec<Edge>;

    /// Nested entries owned by the element itself.
    fn children(&self) -> Vec<Vec<PropertyEntry>> {
        Vec::new()
    }
}

impl Outline for AudioProgramme {
    fn edges(&self) -> Vec<Edge> {
        edges_to("audioContentIDRef", self.get_references::<AudioContent>())
    }
}

impl Outline for AudioContent {
    fn edges(&self) -> Vec<Edge> {
        edges_to("audioObjectIDRef", self.get_references::<AudioObject>())
    }
}

impl Outline for AudioObject {
    fn edges(&self) -> Vec<Edge> {
        let mut edges = edges_to("audioObjectIDRef", self.get_references::<AudioObject>());
        edges.extend(edges_to("audioComplementaryObjectIDRef", self.complementary_objects()));
        edges.extend(edges_to("audioPackFormatIDRef", self.get_references::<AudioPackFormat>()));
        edges.extend(edges_to("audioTrackUIDRef", self.get_references::<AudioTrackUid>()));
        edges
    }
}

impl Outline for AudioPackFormat {
    fn edges(&self) -> Vec<Edge> {
        let mut edges =
            edges_to("audioChannelFormatIDRef", self.get_references::<AudioChannelFormat>());
        edges.extend(edges_to("audioPackFormatIDRef", self.get_references::<AudioPackFormat>()));
        edges
    }
}

impl Outline for AudioChannelFormat {
    fn edges(&self) -> Vec<Edge> {
        Vec::new()
    }

    fn children(&self) -> Vec<Vec<PropertyEntry>> {
        self.block_formats().iter().map(PropertyStore::entries).collect()
    }
}

impl Outline for AudioStreamFormat {
    fn edges(&self) -> Vec<Edge> {
        let mut edges =
            edge_to("audioChannelFormatIDRef", self.get_reference::<AudioChannelFormat>());
        edges.extend(edge_to("audioPackFormatIDRef", self.get_reference::<AudioPackFormat>()));
        edges.extend(edges_to("audioTrackFormatIDRef", self.track_formats()));
        edges
    }
}

impl Outline for AudioTrackFormat {
    fn edges(&self) -> Vec<Edge> {
        edge_to("audioStreamFormatIDRef", self.stream_format())
    }
}

impl Outline for AudioTrackUid {
    fn edges(&self) -> Vec<Edge> {
        let mut edges = edge_to("audioTrackFormatIDRef", self.get_reference::<AudioTrackFormat>());
        edges.extend(edge_to("audioPackFormatIDRef", self.get_reference::<AudioPackFormat>()));
        edges
    }
}

// ============================================================================
// Text
// ============================================================================

/// Write one line per element, followed by its block formats and outgoing
/// references, indented.
pub fn write_overview(document: &Document, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "# ADM document: {} elements", document.len())?;
    write_kind::<AudioProgramme>(document, writer)?;
    write_kind::<AudioContent>(document, writer)?;
    write_kind::<AudioObject>(document, writer)?;
    write_kind::<AudioPackFormat>(document, writer)?;
    write_kind::<AudioChannelFormat>(document, writer)?;
    write_kind::<AudioStreamFormat>(document, writer)?;
    write_kind::<AudioTrackFormat>(document, writer)?;
    write_kind::<AudioTrackUid>(document, writer)?;
    Ok(())
}

fn write_kind<E: Outline>(document: &Document, writer: &mut dyn Write) -> Result<()> {
    let elements = document.get_elements::<E>();
    if elements.is_empty() {
        return Ok(());
    }
    debug!("export: {} [{}]", E::KIND, elements.len());
    writeln!(writer)?;
    writeln!(writer, "## {}", E::KIND)?;
    for element in &elements {
        writeln!(writer, "{}", element)?;
        for child in element.children() {
            writeln!(writer, "  {}", format_entries(&child))?;
        }
        for edge in element.edges() {
            writeln!(writer, "  {} {}", edge.relation, edge.target)?;
        }
    }
    Ok(())
}

fn format_entries(entries: &[PropertyEntry]) -> String {
    let Some((id, rest)) = entries.split_first() else {
        return String::new();
    };
    let attrs: Vec<String> = rest.iter().map(|e| format!("{}={}", e.name, e.value)).collect();
    format!("{} ({})", id.value, attrs.join(", "))
}

// ============================================================================
// JSON
// ============================================================================

/// The same overview as JSON, keyed by element kind.
///
/// ```rust
/// use adm::{AudioProgramme, Document};
///
/// let document = Document::create();
/// document.add(AudioProgramme::create("Show".into())).unwrap();
/// let json = adm::export::to_json(&document);
/// assert_eq!(json["audioProgramme"][0]["id"], "APR_1001");
/// assert_eq!(json["audioProgramme"][0]["properties"]["audioProgrammeName"], "Show");
/// ```
pub fn to_json(document: &Document) -> Value {
    let mut root = Map::new();
    kind_to_json::<AudioProgramme>(document, &mut root);
    kind_to_json::<AudioContent>(document, &mut root);
    kind_to_json::<AudioObject>(document, &mut root);
    kind_to_json::<AudioPackFormat>(document, &mut root);
    kind_to_json::<AudioChannelFormat>(document, &mut root);
    kind_to_json::<AudioStreamFormat>(document, &mut root);
    kind_to_json::<AudioTrackFormat>(document, &mut root);
    kind_to_json::<AudioTrackUid>(document, &mut root);
    Value::Object(root)
}

fn kind_to_json<E: Outline>(document: &Document, root: &mut Map<String, Value>) {
    let elements: Vec<Value> = document
        .get_elements::<E>()
        .iter()
        .map(|element| {
            let mut references = Map::new();
            for edge in element.edges() {
                let targets = references
                    .entry(edge.relation)
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(targets) = targets {
                    targets.push(Value::String(edge.target));
                }
            }
            let mut value = entries_to_json(&element.properties());
            if let Value::Object(object) = &mut value {
                let children = element.children();
                if !children.is_empty() {
                    let blocks = children.iter().map(|c| entries_to_json(c)).collect();
                    object.insert("blocks".into(), Value::Array(blocks));
                }
                object.insert("references".into(), Value::Object(references));
            }
            value
        })
        .collect();
    if !elements.is_empty() {
        root.insert(E::KIND.to_string(), Value::Array(elements));
    }
}

/// `{"id": .., "properties": {..}, "defaults": [..]}`; `defaults` names the
/// properties whose value comes from a default.
fn entries_to_json(entries: &[PropertyEntry]) -> Value {
    let Some((id, rest)) = entries.split_first() else {
        return Value::Null;
    };
    let properties: Map<String, Value> = rest
        .iter()
        .map(|e| (e.name.to_string(), Value::String(e.value.clone())))
        .collect();
    let defaults: Vec<Value> = rest
        .iter()
        .filter(|e| e.is_default)
        .map(|e| Value::String(e.name.to_string()))
        .collect();
    serde_json::json!({
        "id": id.value,
        "properties": properties,
        "defaults": defaults,
    })
}
