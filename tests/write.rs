use anyhow::{Result, anyhow};
use nsexpr::parse::{parse_file, parse_str};
use nsexpr::settings::{Layout, WriteSettings, COMPACT, PRETTY};
use nsexpr::tree::{NodeId, Param, StringLeaf, Tree};
use nsexpr::write::{write_all, write_file};

fn parse_ok(s: &str) -> Result<Tree> {
    parse_str(s)?.ok_or_else(|| anyhow!("no tree for {:?}", s))
}

// Same names, leaf values and quoted flags, recursively.
fn same_structure(a: &Tree, ia: NodeId, b: &Tree, ib: NodeId) -> bool {
    let (na, nb) = (a.node(ia), b.node(ib));
    na.name() == nb.name()
        && na.params().len() == nb.params().len()
        && na.params().iter().zip(nb.params()).all(|pair| match pair {
            (Param::Leaf(la), Param::Leaf(lb)) =>
                la.value() == lb.value() && la.is_quoted() == lb.is_quoted(),
            (Param::Node(ca), Param::Node(cb)) =>
                same_structure(a, *ca, b, *cb),
            (Param::Leaf(_), Param::Node(_)) | (Param::Node(_), Param::Leaf(_)) =>
                false,
        })
}

#[test]
fn serialize_leaves_inline() -> Result<()> {
    let tree = parse_ok(r#"(a b "c c" #$% 1 2.3)"#)?;
    assert_eq!(tree.serialize(), r#"(a b "c c" #$% 1 2.3)"#);
    Ok(())
}

#[test]
fn serialize_nested() -> Result<()> {
    assert_eq!(parse_ok("(a (b c) (d e))")?.serialize(),
               "(a\n\t(b c)\n\t(d e)\n)");
    assert_eq!(parse_ok("(a (b (c d)))")?.serialize(),
               "(a\n\t(b\n\t\t(c d)\n\t)\n)");
    assert_eq!(parse_ok("(a (b) c)")?.serialize(),
               "(a\n\t(b) c)");
    assert_eq!(parse_ok("( a )")?.serialize(), "(a)");
    Ok(())
}

#[test]
fn serialize_subtree() -> Result<()> {
    let tree = parse_ok("(a (b (c d)))")?;
    let b = tree.find_child_by_name(tree.root(), "b", None)
        .ok_or_else(|| anyhow!("no b"))?;
    assert_eq!(tree.serialize_node(b), "(b\n\t(c d)\n)");
    Ok(())
}

#[test]
fn compact_and_custom_indent() -> Result<()> {
    let tree = parse_ok("(a (b (c d)) \"e f\")")?;
    assert_eq!(tree.serialize_with(tree.root(), &COMPACT),
               "(a (b (c d)) \"e f\")");
    let two_spaces = WriteSettings { layout: Layout::Pretty, indent: "  " };
    assert_eq!(tree.serialize_with(tree.root(), &two_spaces),
               "(a\n  (b\n    (c d)\n  ) \"e f\")");
    Ok(())
}

#[test]
fn display_is_serialize() -> Result<()> {
    let tree = parse_ok("(a (b c))")?;
    assert_eq!(tree.to_string(), tree.serialize());
    Ok(())
}

#[test]
fn write_all_adds_newline() -> Result<()> {
    let tree = parse_ok("(a b)")?;
    let mut out = Vec::<u8>::new();
    write_all(&mut out, &tree, &PRETTY)?;
    assert_eq!(out, b"(a b)\n");
    Ok(())
}

#[test]
fn write_file_then_parse_file() -> Result<()> {
    let tree = parse_ok("(a (b \"c d\") e)")?;
    let path = std::env::temp_dir()
        .join(format!("nsexpr-write-{}.sexpr", std::process::id()));
    write_file(&path, &tree, &PRETTY)?;
    let back = parse_file(&path)?.ok_or_else(|| anyhow!("no tree"))?;
    std::fs::remove_file(&path)?;
    assert_eq!(back.serialize(), tree.serialize());
    Ok(())
}

#[test]
fn quoting_is_recomputed_for_leaves_and_names() -> Result<()> {
    let mut tree = Tree::new("a b")?;
    let root = tree.root();
    tree.add_param(root, StringLeaf::new("x"))?;
    tree.add_param(root, StringLeaf::new("y z"))?;
    tree.add_param(root, StringLeaf::new("(p)"))?;
    tree.add_param(root, StringLeaf::new(""))?;
    tree.add_param(root, StringLeaf::quoted("q", true))?;
    // quoted anyway since it couldn't be read back otherwise
    tree.add_param(root, StringLeaf::quoted("r s", false))?;
    assert_eq!(tree.serialize(), r#"("a b" x "y z" "(p)" "" "q" "r s")"#);
    Ok(())
}

#[test]
fn quoted_names_are_written_bare() -> Result<()> {
    assert_eq!(parse_ok("(\"a\" b)")?.serialize(), "(a b)");
    Ok(())
}

#[test]
fn round_trip() -> Result<()> {
    for input in [
        r#"(a b "c c" #$% 1 2.3)"#,
        "(a (b c) (d e))",
        "(aaa (bbb (ccc)) (ccc a b) (ddd (eee)))",
        "(a\n  (b \"\" \"(x)\")\n  c\n  (d (e (f g) h) i))",
        "(\"quoted name\" \"with\ttab\" x)",
        "(\u{3bb} \u{3b1}\u{3b2} \"\u{3b3} \u{3b4}\")",
    ] {
        let tree = parse_ok(input)?;
        let once = tree.serialize();
        let reparsed = parse_ok(&once)?;
        assert!(same_structure(&tree, tree.root(), &reparsed, reparsed.root()),
                "structure changed for {:?}: {:?}", input, once);
        assert_eq!(reparsed.serialize(), once);

        let compact = tree.serialize_with(tree.root(), &COMPACT);
        let reparsed = parse_ok(&compact)?;
        assert!(same_structure(&tree, tree.root(), &reparsed, reparsed.root()));
    }
    Ok(())
}
