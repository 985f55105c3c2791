//! Single-pass construction of a `PositionIndex`.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::PositionIndex;
use crate::error::ParseError;
use crate::xml::scanner::{ScanEvent, Scanner};

impl PositionIndex {
    /// Streams `xml` once and records the line range of every element.
    ///
    /// Fails with the location of the first well-formedness error.
    pub fn build(xml: &str) -> Result<Self, ParseError> {
        let mut scanner = Scanner::new(xml);
        let mut entries = FxHashMap::default();

        while let Some(event) = scanner.next_event()? {
            if let ScanEvent::Close(closed) = event {
                entries.insert(closed.path, closed.range);
            }
        }

        debug!(elements = entries.len(), "built position index");
        Ok(PositionIndex { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::index::LineRange;

    const ONTOLOGY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:owl="http://www.w3.org/2002/07/owl#" xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#" xmlns:skos="http://www.w3.org/2004/02/skos/core#" xml:base="http://www.persone/">
    <rdfs:label xml:lang="it">Ind</rdfs:label>
    <owl:Class rdf:about="http://www.persone#Individuo">
        <rdfs:label xml:lang="it">Ind</rdfs:label>
        <skos:scopeNote xml:lang="it">Class</skos:scopeNote>
    </owl:Class>
    <owl:Class rdf:about="http://www.persone#Individuo">
        <rdfs:label xml:lang="it">Ind</rdfs:label>
        <skos:scopeNote xml:lang="it">Class</skos:scopeNote>
    </owl:Class>
    <owl:ObjectProperty rdf:about="http://www.persone#hasName">
        <rdfs:label xml:lang="it">Name</rdfs:label>
        <rdfs:domain rdf:resource="http://www.persone#Individuo"/>
        <rdfs:range rdf:resource="http://www.persone#Name"/>
    </owl:ObjectProperty>
</rdf:RDF>
"#;

    fn range(index: &PositionIndex, path: &str) -> Option<(usize, usize)> {
        index.lookup(path).map(|r| (r.start(), r.end()))
    }

    #[test]
    fn test_root_spans_document() {
        let index = PositionIndex::build(ONTOLOGY).unwrap();
        assert_eq!(range(&index, "/RDF[1]"), Some((2, 17)));
    }

    #[test]
    fn test_nested_and_sibling_elements() {
        let index = PositionIndex::build(ONTOLOGY).unwrap();
        assert_eq!(range(&index, "/RDF[1]/label[1]"), Some((3, 3)));
        assert_eq!(range(&index, "/RDF[1]/Class[1]"), Some((4, 7)));
        assert_eq!(range(&index, "/RDF[1]/Class[1]/label[1]"), Some((5, 5)));
        assert_eq!(range(&index, "/RDF[1]/Class[1]/scopeNote[1]"), Some((6, 6)));
        assert_eq!(range(&index, "/RDF[1]/Class[2]"), Some((8, 11)));
        assert_eq!(range(&index, "/RDF[1]/Class[2]/scopeNote[1]"), Some((10, 10)));
        assert_eq!(range(&index, "/RDF[1]/ObjectProperty[1]"), Some((12, 16)));
        assert_eq!(
            range(&index, "/RDF[1]/ObjectProperty[1]/domain[1]"),
            Some((14, 14))
        );
    }

    #[test]
    fn test_unknown_path() {
        let index = PositionIndex::build(ONTOLOGY).unwrap();
        assert_eq!(range(&index, "/RDF[1]/NonExistentTag[1]"), None);
        assert_eq!(range(&index, "/RDF[1]/Class[3]"), None);
        assert_eq!(range(&index, "not a path"), None);
    }

    #[test]
    fn test_every_element_indexed() {
        let index = PositionIndex::build(ONTOLOGY).unwrap();
        assert_eq!(index.len(), 12);
        let sorted = index.sorted();
        assert_eq!(sorted[0].0.to_string(), "/RDF[1]");
        assert_eq!(sorted[0].1, LineRange::new(2, 17));
    }

    #[test]
    fn test_single_root() {
        let index = PositionIndex::build("<only>\n\n</only>\n").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(range(&index, "/only[1]"), Some((1, 3)));
    }

    #[test]
    fn test_prefixed_siblings_share_ordinals() {
        let xml = r#"<r xmlns:a="urn:a" xmlns:b="urn:b"><a:x/><b:x/></r>"#;
        let index = PositionIndex::build(xml).unwrap();
        assert!(index.lookup("/r[1]/x[1]").is_some());
        assert!(index.lookup("/r[1]/x[2]").is_some());
    }

    #[test]
    fn test_mismatched_nesting_fails() {
        let err = PositionIndex::build("<r>\n<a></b>\n</r>").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Syntax(_)));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = PositionIndex::build("   ").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyDocument);
    }
}
