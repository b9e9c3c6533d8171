#[cfg(test)]
mod tests {
    use crate::native::archive::{self, Value};
    use crate::native::lexer::{tokenize, Token};
    use crate::native::{NativeProjectParser, ProjectGraph, SourceTree};
    use crate::tree::NodeKind;
    use crate::TreeError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const SAMPLE: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 46;
	objects = {

/* Begin PBXFileReference section */
		A10000000000000000000001 /* AppDelegate.swift */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.swift; path = AppDelegate.swift; sourceTree = "<group>"; };
		A10000000000000000000002 /* Info.plist */ = {isa = PBXFileReference; lastKnownFileType = text.plist.xml; path = Info.plist; sourceTree = "<group>"; };
		A10000000000000000000003 /* Demo.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = Demo.app; sourceTree = BUILT_PRODUCTS_DIR; };
		A10000000000000000000004 /* README.md */ = {isa = PBXFileReference; path = README.md; sourceTree = SOURCE_ROOT; };
		A10000000000000000000005 /* Missing.swift */ = {isa = PBXFileReference; path = Missing.swift; sourceTree = "<group>"; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
		B10000000000000000000001 = {
			isa = PBXGroup;
			children = (
				B10000000000000000000002 /* Demo */,
				B10000000000000000000003 /* Products */,
				A10000000000000000000004 /* README.md */,
				B10000000000000000000004 /* Empty */,
			);
			sourceTree = "<group>";
		};
		B10000000000000000000002 /* Demo */ = {
			isa = PBXGroup;
			children = (
				A10000000000000000000001 /* AppDelegate.swift */,
				A10000000000000000000002 /* Info.plist */,
				A10000000000000000000005 /* Missing.swift */,
			);
			path = Demo;
			sourceTree = "<group>";
		};
		B10000000000000000000003 /* Products */ = {
			isa = PBXGroup;
			children = (
				A10000000000000000000003 /* Demo.app */,
			);
			name = Products;
			sourceTree = "<group>";
		};
		B10000000000000000000004 /* Empty */ = {
			isa = PBXGroup;
			children = (
			);
			path = "Does Not Exist";
			sourceTree = "<group>";
		};
/* End PBXGroup section */

/* Begin PBXProject section */
		C10000000000000000000001 /* Project object */ = {
			isa = PBXProject;
			buildConfigurationList = D10000000000000000000001 /* Build configuration list for PBXProject "Demo" */;
			mainGroup = B10000000000000000000001;
			productRefGroup = B10000000000000000000003 /* Products */;
			projectDirPath = "";
			targets = (
			);
		};
/* End PBXProject section */
	};
	rootObject = C10000000000000000000001 /* Project object */;
}
"#;

    /// Lay out `<tmp>/Demo/...` sources and `<tmp>/Demo.xcodeproj/project.pbxproj`
    fn fixture(archive: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let sources = tmp.path().join("Demo");
        fs::create_dir_all(&sources).unwrap();
        fs::write(sources.join("AppDelegate.swift"), "").unwrap();
        fs::write(sources.join("Info.plist"), "").unwrap();
        fs::write(tmp.path().join("README.md"), "").unwrap();

        let bundle = tmp.path().join("Demo.xcodeproj");
        fs::create_dir_all(&bundle).unwrap();
        let archive_path = bundle.join("project.pbxproj");
        fs::write(&archive_path, archive).unwrap();
        (tmp, archive_path)
    }

    fn names(nodes: &[crate::TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name()).collect()
    }

    // ========================================================================
    // Lexer
    // ========================================================================

    #[test]
    fn test_lex_record_with_comment() {
        let tokens: Vec<Token> = tokenize("ABC /* Demo */ = {isa = PBXGroup;};")
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::String("ABC".into()),
                Token::Comment("Demo".into()),
                Token::Equals,
                Token::LBrace,
                Token::String("isa".into()),
                Token::Equals,
                Token::String("PBXGroup".into()),
                Token::Semicolon,
                Token::RBrace,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_lex_quoted_escapes() {
        let tokens = tokenize(r#"name = "My \"App\"\tX";"#).unwrap();
        assert_eq!(tokens[2].token, Token::String("My \"App\"\tX".into()));
    }

    #[test]
    fn test_lex_line_comment_skipped() {
        let tokens = tokenize("// !$*UTF8*$!\n{ }").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn test_lex_bare_word_with_slashes() {
        let tokens = tokenize("path = Sources/App/main.swift;").unwrap();
        assert_eq!(tokens[2].token, Token::String("Sources/App/main.swift".into()));
    }

    #[test]
    fn test_lex_comment_directly_after_word() {
        let tokens = tokenize("ABC/* x */").unwrap();
        assert_eq!(tokens[0].token, Token::String("ABC".into()));
        assert_eq!(tokens[1].token, Token::Comment("x".into()));
    }

    #[test]
    fn test_lex_unterminated_string() {
        let err = tokenize("name = \"open;\n").unwrap_err();
        assert!(err.to_string().contains("line 1: unterminated string"));
    }

    #[test]
    fn test_lex_unterminated_comment() {
        let err = tokenize("a = b;\n/* never closed").unwrap_err();
        assert!(err.to_string().contains("line 2: unterminated comment"));
    }

    // ========================================================================
    // Archive reader
    // ========================================================================

    #[test]
    fn test_archive_keeps_key_annotation() {
        let root = archive::parse("{ objects = { ABC /* Demo */ = { isa = PBXGroup; }; }; }").unwrap();
        let objects = root.get_dict("objects").unwrap();
        let entry = objects.get_entry("ABC").unwrap();
        assert_eq!(entry.annotation.as_deref(), Some("Demo"));
        assert_eq!(entry.value.as_dict().unwrap().get_str("isa"), Some("PBXGroup"));
    }

    #[test]
    fn test_archive_arrays_with_trailing_comma_and_comments() {
        let root = archive::parse("{ children = ( A /* a */, B /* b */, ); empty = ( ); }").unwrap();
        let children: Vec<_> = root
            .get("children")
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(children, vec!["A", "B"]);
        assert_eq!(root.get("empty").and_then(Value::as_array).unwrap().len(), 0);
    }

    #[test]
    fn test_archive_fields_in_any_order() {
        let root = archive::parse(
            "{ objects = { G = { sourceTree = \"<group>\"; path = Src; isa = PBXGroup; name = Source; }; }; }",
        )
        .unwrap();
        let group = root.get_dict("objects").unwrap().get_dict("G").unwrap();
        assert_eq!(group.get_str("name"), Some("Source"));
        assert_eq!(group.get_str("path"), Some("Src"));
    }

    #[test]
    fn test_archive_missing_semicolon() {
        let err = archive::parse("{ a = b }").unwrap_err();
        assert!(matches!(err, TreeError::Parse { .. }));
    }

    #[test]
    fn test_archive_root_must_be_dict() {
        assert!(archive::parse("( a, b )").is_err());
    }

    // ========================================================================
    // Records
    // ========================================================================

    #[test]
    fn test_graph_records() {
        let root = archive::parse(SAMPLE).unwrap();
        let graph = ProjectGraph::from_archive(&root).unwrap();
        assert_eq!(graph.main_group, "B10000000000000000000001");
        assert_eq!(graph.groups.len(), 4);
        assert_eq!(graph.files.len(), 5);

        let main = graph.group("B10000000000000000000001").unwrap();
        assert_eq!(main.children.len(), 4);
        assert_eq!(main.name, "B10000000000000000000001");

        let demo = graph.group("B10000000000000000000002").unwrap();
        assert_eq!(demo.name, "Demo");
        assert_eq!(demo.path.as_deref(), Some("Demo"));
        assert_eq!(demo.source_tree, Some(SourceTree::Group));

        let app = graph.file("A10000000000000000000003").unwrap();
        assert_eq!(app.name, "Demo.app");
        assert_eq!(
            app.source_tree,
            Some(SourceTree::Other("BUILT_PRODUCTS_DIR".into()))
        );

        let readme = graph.file("A10000000000000000000004").unwrap();
        assert_eq!(readme.source_tree, Some(SourceTree::SourceRoot));
    }

    #[test]
    fn test_graph_file_path_falls_back_to_comment() {
        let text = "{ objects = {
            G = { isa = PBXGroup; children = ( F ); };
            F /* Shared.h */ = { isa = PBXFileReference; sourceTree = \"<group>\"; };
            P = { isa = PBXProject; mainGroup = G; };
        }; }";
        let graph = ProjectGraph::from_archive(&archive::parse(text).unwrap()).unwrap();
        let file = graph.file("F").unwrap();
        assert_eq!(file.path, "Shared.h");
        assert_eq!(file.name, "Shared.h");
    }

    #[test]
    fn test_graph_variant_group_is_group() {
        let text = "{ objects = {
            G = { isa = PBXGroup; children = ( V ); };
            V /* Main.storyboard */ = { isa = PBXVariantGroup; children = ( F ); name = Main.storyboard; sourceTree = \"<group>\"; };
            F = { isa = PBXFileReference; path = Base.lproj/Main.storyboard; sourceTree = \"<group>\"; };
            P = { isa = PBXProject; mainGroup = G; };
        }; }";
        let graph = ProjectGraph::from_archive(&archive::parse(text).unwrap()).unwrap();
        assert_eq!(graph.group("V").unwrap().name, "Main.storyboard");
        assert_eq!(graph.file("F").unwrap().name, "Main.storyboard");
    }

    #[test]
    fn test_graph_missing_groups() {
        let text = "{ objects = { F = { isa = PBXFileReference; path = a; }; P = { isa = PBXProject; mainGroup = G; }; }; }";
        let err = ProjectGraph::from_archive(&archive::parse(text).unwrap()).unwrap_err();
        assert!(matches!(err, TreeError::Structural { .. }));
        assert!(err.to_string().contains("Could not find PBXGroup section"));
    }

    #[test]
    fn test_graph_missing_files() {
        let text = "{ objects = { G = { isa = PBXGroup; }; P = { isa = PBXProject; mainGroup = G; }; }; }";
        let err = ProjectGraph::from_archive(&archive::parse(text).unwrap()).unwrap_err();
        assert!(err.to_string().contains("Could not find PBXFileReference section"));
    }

    #[test]
    fn test_graph_missing_main_group() {
        let text = "{ objects = { G = { isa = PBXGroup; }; F = { isa = PBXFileReference; path = a; }; P = { isa = PBXProject; }; }; }";
        let err = ProjectGraph::from_archive(&archive::parse(text).unwrap()).unwrap_err();
        assert!(err.to_string().contains("Could not find main group"));
    }

    #[test]
    fn test_graph_root_object_selects_project() {
        let text = "{ objects = {
            G1 = { isa = PBXGroup; };
            G2 = { isa = PBXGroup; };
            F = { isa = PBXFileReference; path = a; };
            P1 = { isa = PBXProject; mainGroup = G1; };
            P2 = { isa = PBXProject; mainGroup = G2; };
        }; rootObject = P2; }";
        let graph = ProjectGraph::from_archive(&archive::parse(text).unwrap()).unwrap();
        assert_eq!(graph.main_group, "G2");
    }

    // ========================================================================
    // Tree materialization
    // ========================================================================

    #[test]
    fn test_parse_sample_project() {
        let (tmp, archive_path) = fixture(SAMPLE);
        let root = NativeProjectParser::new().parse_project(&archive_path).unwrap();

        assert_eq!(root.name(), "Demo");
        assert_eq!(root.id(), "root");
        assert_eq!(root.path(), Some("Demo.xcodeproj"));
        // Products survives empty because it inherits an existing directory
        assert_eq!(names(root.children()), vec!["Demo", "Products", "README.md"]);

        let demo = &root.children()[0];
        assert_eq!(demo.path(), Some("Demo"));
        assert!(demo.full_path().unwrap().ends_with("Demo"));
        assert_eq!(names(demo.children()), vec!["AppDelegate.swift", "Info.plist"]);

        let products = root.child("Products").unwrap();
        assert!(!products.has_children());
        assert!(products.full_path().is_some());

        let readme = root.child("README.md").unwrap();
        assert_eq!(readme.kind(), NodeKind::File);
        assert_eq!(
            readme.full_path().unwrap().file_name(),
            tmp.path().join("README.md").file_name()
        );
    }

    #[test]
    fn test_parse_bundle_directory() {
        let (_tmp, archive_path) = fixture(SAMPLE);
        let bundle = archive_path.parent().unwrap();
        let root = NativeProjectParser::new().parse_project(bundle).unwrap();
        assert_eq!(root.name(), "Demo");
    }

    #[test]
    fn test_pruning_invariant() {
        let (_tmp, archive_path) = fixture(SAMPLE);
        let root = NativeProjectParser::new().parse_project(&archive_path).unwrap();
        for node in root.walk() {
            if node.is_group() {
                assert!(node.has_children() || node.full_path().is_some(), "{}", node.id());
            } else {
                assert!(node.full_path().map(Path::exists).unwrap_or(true));
            }
        }
    }

    #[test]
    fn test_source_root_group_resolves_from_project_dir() {
        let text = "{ objects = {
            M = { isa = PBXGroup; children = ( G ); sourceTree = \"<group>\"; };
            G = { isa = PBXGroup; children = ( F ); path = Demo; sourceTree = SOURCE_ROOT; };
            F = { isa = PBXFileReference; path = Info.plist; sourceTree = \"<group>\"; };
            P = { isa = PBXProject; mainGroup = M; };
        }; }";
        let (_tmp, archive_path) = fixture(text);
        let root = NativeProjectParser::new().parse_project(&archive_path).unwrap();
        assert_eq!(names(root.children()), vec!["Demo"]);
        assert_eq!(names(root.children()[0].children()), vec!["Info.plist"]);
    }

    #[test]
    fn test_absolute_file_used_literally() {
        let (tmp, _) = fixture(SAMPLE);
        let outside = tmp.path().join("outside.txt");
        fs::write(&outside, "").unwrap();
        let text = format!(
            "{{ objects = {{
            M = {{ isa = PBXGroup; children = ( F ); }};
            F = {{ isa = PBXFileReference; path = \"{}\"; sourceTree = \"<absolute>\"; }};
            P = {{ isa = PBXProject; mainGroup = M; }};
        }}; }}",
            outside.display()
        );
        let archive_path = tmp.path().join("Demo.xcodeproj").join("project.pbxproj");
        fs::write(&archive_path, text).unwrap();

        let root = NativeProjectParser::new().parse_project(&archive_path).unwrap();
        assert_eq!(names(root.children()), vec!["outside.txt"]);
    }

    #[test]
    fn test_self_referencing_group_is_cycle_error() {
        let text = "{ objects = {
            M = { isa = PBXGroup; children = ( G ); };
            G = { isa = PBXGroup; children = ( G ); };
            F = { isa = PBXFileReference; path = a; };
            P = { isa = PBXProject; mainGroup = M; };
        }; }";
        let (_tmp, archive_path) = fixture(text);
        let err = NativeProjectParser::new().parse_project(&archive_path).unwrap_err();
        assert!(matches!(err, TreeError::Structural { .. }));
        assert!(err.to_string().contains("cycle detected at group G"));
    }

    #[test]
    fn test_mutual_cycle_through_main_group() {
        let text = "{ objects = {
            M = { isa = PBXGroup; children = ( A ); };
            A = { isa = PBXGroup; children = ( B ); };
            B = { isa = PBXGroup; children = ( M ); };
            F = { isa = PBXFileReference; path = a; };
            P = { isa = PBXProject; mainGroup = M; };
        }; }";
        let (_tmp, archive_path) = fixture(text);
        let err = NativeProjectParser::new().parse_project(&archive_path).unwrap_err();
        assert!(err.to_string().contains("cycle detected at group M"));
    }

    #[test]
    fn test_shared_group_is_not_a_cycle() {
        let text = "{ objects = {
            M = { isa = PBXGroup; children = ( A, B ); };
            A = { isa = PBXGroup; children = ( S ); name = A; };
            B = { isa = PBXGroup; children = ( S ); name = B; };
            S = { isa = PBXGroup; children = ( F ); path = Demo; sourceTree = \"<group>\"; };
            F = { isa = PBXFileReference; path = Info.plist; sourceTree = \"<group>\"; };
            P = { isa = PBXProject; mainGroup = M; };
        }; }";
        let (_tmp, archive_path) = fixture(text);
        let root = NativeProjectParser::new().parse_project(&archive_path).unwrap();
        assert_eq!(names(root.children()), vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_child_ids_skipped() {
        let text = "{ objects = {
            M = { isa = PBXGroup; children = ( NOPE, F ); };
            F = { isa = PBXFileReference; path = README.md; sourceTree = SOURCE_ROOT; };
            P = { isa = PBXProject; mainGroup = M; };
        }; }";
        let (_tmp, archive_path) = fixture(text);
        let root = NativeProjectParser::new().parse_project(&archive_path).unwrap();
        assert_eq!(names(root.children()), vec!["README.md"]);
    }

    #[test]
    fn test_main_group_must_be_group() {
        let text = "{ objects = {
            G = { isa = PBXGroup; };
            F = { isa = PBXFileReference; path = a; };
            P = { isa = PBXProject; mainGroup = F; };
        }; }";
        let (_tmp, archive_path) = fixture(text);
        let err = NativeProjectParser::new().parse_project(&archive_path).unwrap_err();
        assert!(matches!(err, TreeError::Structural { .. }));
    }

    #[test]
    fn test_missing_archive() {
        let tmp = TempDir::new().unwrap();
        let err = NativeProjectParser::new()
            .parse_project(&tmp.path().join("project.pbxproj"))
            .unwrap_err();
        assert!(matches!(err, TreeError::FileNotFound(_)));
    }

    #[test]
    fn test_output_is_deterministic() {
        let (_tmp, archive_path) = fixture(SAMPLE);
        let parser = NativeProjectParser::new();
        let first = parser.parse_project(&archive_path).unwrap().to_json().unwrap();
        let second = parser.parse_project(&archive_path).unwrap().to_json().unwrap();
        assert_eq!(first, second);
    }
}
