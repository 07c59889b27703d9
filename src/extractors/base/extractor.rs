// BaseExtractor implementation for typelink
//
// Holds the file being extracted and the node helpers every extractor needs:
// text slicing, id generation and line spans.

use md5;
use tree_sitter::Node;

/// Per-file extraction state shared by language extractors
pub struct BaseExtractor {
    /// Relative Unix-style path, as stored on the FileRecord
    pub file_path: String,
    pub content: String,
}

impl BaseExtractor {
    pub fn new(file_path: String, content: String) -> Self {
        Self {
            file_path,
            content,
        }
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> String {
        let start_byte = node.start_byte();
        let end_byte = node.end_byte();

        // Use byte slice but handle UTF-8 boundaries properly
        let content_bytes = self.content.as_bytes();
        if start_byte < content_bytes.len() && end_byte <= content_bytes.len() {
            String::from_utf8_lossy(&content_bytes[start_byte..end_byte]).to_string()
        } else {
            String::new()
        }
    }

    /// Generate ID for a declaration (MD5 of `path:name:line:column`)
    pub fn generate_id(&self, name: &str, line: u32, column: u32) -> String {
        let input = format!("{}:{}:{}:{}", self.file_path, name, line, column);
        let digest = md5::compute(input.as_bytes());
        format!("{:x}", digest)
    }

    /// ID for a declaration rooted at `node`
    pub fn node_id(&self, node: &Node, name: &str) -> String {
        let start = node.start_position();
        self.generate_id(name, start.row as u32, start.column as u32)
    }

    /// 1-based (start, end) lines of a node
    pub fn line_span(&self, node: &Node) -> (u32, u32) {
        (
            (node.start_position().row + 1) as u32,
            (node.end_position().row + 1) as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_stable_and_path_sensitive() {
        let a = BaseExtractor::new("A.cs".into(), String::new());
        let b = BaseExtractor::new("B.cs".into(), String::new());

        assert_eq!(a.generate_id("Foo", 3, 4), a.generate_id("Foo", 3, 4));
        assert_ne!(a.generate_id("Foo", 3, 4), b.generate_id("Foo", 3, 4));
        assert_ne!(a.generate_id("Foo", 3, 4), a.generate_id("Foo", 4, 4));
        assert_eq!(a.generate_id("Foo", 3, 4).len(), 32);
    }
}
