//! RBI rendering for the declaration tree.
//!
//! Each class node becomes one file:
//!
//! ```text
//! # typed: strong
//!
//! # DO NOT EDIT MANUALLY
//! # Declarations for dynamic methods in `Post`.
//! # Regenerate with `attache generate --only Post`.
//!
//! class Post
//!   sig { returns(ActiveStorage::Attached::One) }
//!   def photo; end
//!
//!   sig { params(attachable: T.untyped).returns(T.untyped) }
//!   def photo=(attachable); end
//! end
//! ```

use std::fmt::Write;
use std::path::PathBuf;

use crate::config::RenderConfig;
use crate::signature::MethodSignature;
use crate::tree::{DeclarationTree, Scope};

const INDENT: &str = "  ";

/// One rendered declaration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Class path the file declares
    pub class: String,
    /// Location relative to the output directory
    pub relative_path: PathBuf,
    /// File contents
    pub contents: String,
}

/// Render every node of the tree, sorted by class path.
pub fn render_tree(tree: &DeclarationTree, config: &RenderConfig) -> Vec<RenderedFile> {
    tree.snapshot()
        .into_iter()
        .map(|(class, scope)| RenderedFile {
            relative_path: file_path_for(&class),
            contents: render_scope(&class, &scope, config),
            class,
        })
        .collect()
}

/// Render a single class node.
pub fn render_scope(class_path: &str, scope: &Scope, config: &RenderConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# typed: {}", config.strictness);
    out.push('\n');

    if !config.banner.is_empty() {
        for line in config.banner.lines() {
            let _ = writeln!(out, "# {}", line);
        }
        let _ = writeln!(out, "# Declarations for dynamic methods in `{}`.", class_path);
        let _ = writeln!(out, "# Regenerate with `attache generate --only {}`.", class_path);
        out.push('\n');
    }

    let _ = writeln!(out, "class {}", class_path);
    for (i, method) in scope.methods().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_method(&mut out, method, config);
    }
    out.push_str("end\n");
    out
}

fn render_method(out: &mut String, method: &MethodSignature, config: &RenderConfig) {
    let returns = config.type_name(method.return_type);
    if method.parameters.is_empty() {
        let _ = writeln!(out, "{}sig {{ returns({}) }}", INDENT, returns);
        let _ = writeln!(out, "{}def {}; end", INDENT, method.name);
        return;
    }

    let typed: Vec<String> = method
        .parameters
        .iter()
        .map(|p| format!("{}: {}", p.name, config.type_name(p.ty)))
        .collect();
    let names: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();

    let _ = writeln!(
        out,
        "{}sig {{ params({}).returns({}) }}",
        INDENT,
        typed.join(", "),
        returns
    );
    let _ = writeln!(out, "{}def {}({}); end", INDENT, method.name, names.join(", "));
}

/// Output file for a class path: `Admin::BlogPost` → `admin/blog_post.rbi`.
pub fn file_path_for(class_path: &str) -> PathBuf {
    let mut path: PathBuf = class_path
        .split("::")
        .filter(|segment| !segment.is_empty())
        .map(underscore)
        .collect();
    path.set_extension("rbi");
    path
}

/// `BlogPost` → `blog_post`, `HTMLParser` → `html_parser`.
pub fn underscore(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{DeclType, Parameter};

    fn post_tree() -> DeclarationTree {
        let tree = DeclarationTree::new();
        let node = tree.create_path_if_absent("Post");
        node.create_method("photo", vec![], DeclType::AttachedOne);
        node.create_method(
            "photo=",
            vec![Parameter::new("attachable", DeclType::Unknown)],
            DeclType::Unknown,
        );
        tree
    }

    #[test]
    fn test_render_scope() {
        let tree = post_tree();
        let files = render_tree(&tree, &RenderConfig::default());
        assert_eq!(files.len(), 1);

        let expected = "\
# typed: strong

# DO NOT EDIT MANUALLY
# Declarations for dynamic methods in `Post`.
# Regenerate with `attache generate --only Post`.

class Post
  sig { returns(ActiveStorage::Attached::One) }
  def photo; end

  sig { params(attachable: T.untyped).returns(T.untyped) }
  def photo=(attachable); end
end
";
        assert_eq!(files[0].contents, expected);
        assert_eq!(files[0].relative_path, PathBuf::from("post.rbi"));
    }

    #[test]
    fn test_render_without_banner() {
        let tree = post_tree();
        let config = RenderConfig {
            banner: String::new(),
            strictness: "true".to_string(),
            ..RenderConfig::default()
        };
        let contents = render_scope("Post", &tree.get("Post").unwrap().snapshot(), &config);
        assert!(contents.starts_with("# typed: true\n\nclass Post\n"));
        assert!(!contents.contains("DO NOT EDIT"));
    }

    #[test]
    fn test_multiline_banner_follows_header() {
        let tree = post_tree();
        let config = RenderConfig {
            banner: "Generated file\nRun attache to update".to_string(),
            ..RenderConfig::default()
        };
        let contents = render_scope("Post", &tree.get("Post").unwrap().snapshot(), &config);
        assert!(contents.starts_with(
            "# typed: strong\n\n# Generated file\n# Run attache to update\n# Declarations"
        ));
    }

    #[test]
    fn test_file_path_for() {
        assert_eq!(file_path_for("Post"), PathBuf::from("post.rbi"));
        assert_eq!(
            file_path_for("Admin::BlogPost"),
            PathBuf::from("admin").join("blog_post.rbi")
        );
        assert_eq!(file_path_for("::Post"), PathBuf::from("post.rbi"));
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("Post"), "post");
        assert_eq!(underscore("BlogPost"), "blog_post");
        assert_eq!(underscore("HTMLParser"), "html_parser");
        assert_eq!(underscore("V2Post"), "v2_post");
        assert_eq!(underscore("API"), "api");
    }
}
