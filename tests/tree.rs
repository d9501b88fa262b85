use anyhow::{Result, anyhow};
use nsexpr::number::{parse_number, Number};
use nsexpr::parse::parse_str;
use nsexpr::tree::{needs_quoting, NodeId, Param, StringLeaf, Tree, TreeError};
use num::BigInt;
use std::any::Any;

fn parse_ok(s: &str) -> Result<Tree> {
    parse_str(s)?.ok_or_else(|| anyhow!("no tree for {:?}", s))
}

fn leaf_values(tree: &Tree, id: NodeId) -> Vec<String> {
    tree.node(id).params().iter().map(|p| match p {
        Param::Leaf(l) => l.value().to_string(),
        Param::Node(c) => format!("({})", tree.node(*c).name()),
    }).collect()
}

#[test]
fn build_from_scratch() -> Result<()> {
    let mut tree = Tree::new("root")?;
    let root = tree.root();
    assert_eq!(tree.parent(root), None);
    assert_eq!(tree.root_node().pos(), None);

    let child = tree.new_node("child")?;
    assert_eq!(tree.parent(child), None);
    tree.add_param(root, StringLeaf::new("a"))?;
    tree.add_param(root, child)?;
    tree.add_param(child, StringLeaf::new("b"))?;

    assert_eq!(tree.parent(child), Some(root));
    assert_eq!(tree.index_in_parent(child), Some(1));
    assert_eq!(tree.node(root).leaf(0).and_then(|l| l.parent()), Some(root));
    assert_eq!(tree.node(child).leaf(0).and_then(|l| l.parent()), Some(child));
    assert_eq!(tree.node(root).child_nodes().collect::<Vec<_>>(), vec![child]);
    assert_eq!(tree.serialize(), "(root a\n\t(child b)\n)");
    Ok(())
}

#[test]
fn empty_names_are_rejected() -> Result<()> {
    assert_eq!(Tree::new("").err(), Some(TreeError::EmptyName));
    let mut tree = Tree::new("a")?;
    assert_eq!(tree.new_node("").err(), Some(TreeError::EmptyName));
    let root = tree.root();
    assert_eq!(tree.set_name(root, ""), Err(TreeError::EmptyName));
    tree.set_name(root, "b c")?;
    assert_eq!(tree.serialize(), "(\"b c\")");
    Ok(())
}

#[test]
fn insert_param() -> Result<()> {
    let mut tree = parse_ok("(a x y)")?;
    let root = tree.root();
    tree.insert_param(root, 0, StringLeaf::new("w"))?;
    tree.insert_param(root, 2, StringLeaf::new("x2"))?;
    // inserting at the length appends
    tree.insert_param(root, 4, StringLeaf::new("z"))?;
    assert_eq!(leaf_values(&tree, root), vec!["w", "x", "x2", "y", "z"]);
    assert_eq!(tree.insert_param(root, 6, StringLeaf::new("q")),
               Err(TreeError::IndexOutOfRange { index: 6, len: 5 }));

    let n = tree.new_node("n")?;
    tree.insert_param(root, 1, n)?;
    assert_eq!(tree.index_in_parent(n), Some(1));
    assert_eq!(tree.parent(n), Some(root));
    Ok(())
}

#[test]
fn set_param() -> Result<()> {
    let mut tree = parse_ok("(a x (b) y)")?;
    let root = tree.root();
    let b = tree.node(root).params()[1].as_node().ok_or_else(|| anyhow!("no b"))?;

    let old = tree.set_param(root, 1, StringLeaf::new("z"))?;
    assert_eq!(old, Param::Node(b));
    // the replaced node is detached but still exists
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.node(b).name(), "b");
    assert_eq!(tree.index_in_parent(b), None);
    assert_eq!(leaf_values(&tree, root), vec!["x", "z", "y"]);

    let old = tree.set_param(root, 0, b)?;
    let old = old.as_leaf().ok_or_else(|| anyhow!("expected a leaf"))?;
    assert_eq!(old.value(), "x");
    assert_eq!(old.parent(), None);
    assert_eq!(tree.parent(b), Some(root));
    assert_eq!(leaf_values(&tree, root), vec!["(b)", "z", "y"]);

    assert_eq!(tree.set_param(root, 3, StringLeaf::new("q")).err(),
               Some(TreeError::IndexOutOfRange { index: 3, len: 3 }));
    Ok(())
}

#[test]
fn remove_param() -> Result<()> {
    let mut tree = parse_ok("(a x (b c) y)")?;
    let root = tree.root();
    let b = tree.find_direct_child_by_name(root, "b")
        .ok_or_else(|| anyhow!("no b"))?;

    assert_eq!(tree.remove_param(root, 1)?, Param::Node(b));
    assert_eq!(tree.parent(b), None);
    assert_eq!(leaf_values(&tree, root), vec!["x", "y"]);
    assert_eq!(tree.find_child_by_name(root, "b", None), None);
    // detached nodes keep their own parameters
    assert_eq!(leaf_values(&tree, b), vec!["c"]);
    assert_eq!(tree.len(), 2);

    assert_eq!(tree.remove_param(root, 2).err(),
               Some(TreeError::IndexOutOfRange { index: 2, len: 2 }));

    // and can be attached again
    tree.add_param(root, b)?;
    assert_eq!(tree.serialize(), "(a x y\n\t(b c)\n)");
    Ok(())
}

#[test]
fn attaching_twice_or_in_a_cycle_fails() -> Result<()> {
    let mut tree = parse_ok("(a (b (c)))")?;
    let root = tree.root();
    let b = tree.find_child_by_name(root, "b", None).ok_or_else(|| anyhow!("no b"))?;
    let c = tree.find_child_by_name(root, "c", None).ok_or_else(|| anyhow!("no c"))?;

    assert_eq!(tree.add_param(root, c), Err(TreeError::AlreadyAttached(c)));
    assert_eq!(tree.add_param(c, root), Err(TreeError::AlreadyAttached(root)));

    tree.remove_param(root, 0)?;
    assert_eq!(tree.add_param(c, b), Err(TreeError::WouldCycle(b)));
    assert_eq!(tree.add_param(b, b), Err(TreeError::WouldCycle(b)));
    // nothing changed by the failed attempts
    assert!(tree.node(c).params().is_empty());
    assert_eq!(tree.parent(b), None);
    Ok(())
}

#[test]
fn unknown_nodes() -> Result<()> {
    let mut other = Tree::new("other")?;
    let foreign = other.new_node("x")?;
    let mut tree = Tree::new("a")?;
    assert_eq!(tree.get(foreign), None);
    assert_eq!(tree.add_param(foreign, StringLeaf::new("v")),
               Err(TreeError::UnknownNode(foreign)));
    let root = tree.root();
    assert_eq!(tree.add_param(root, foreign), Err(TreeError::UnknownNode(foreign)));
    Ok(())
}

#[test]
fn params_from_type_erased_values() -> Result<()> {
    let v: Box<dyn Any> = Box::new(42i32);
    assert_eq!(Param::try_from(v), Err(TreeError::InvalidParameterType));
    let v: Box<dyn Any> = Box::new("a str");
    assert_eq!(Param::try_from(v), Err(TreeError::InvalidParameterType));

    let v: Box<dyn Any> = Box::new(StringLeaf::new("s"));
    let p = Param::try_from(v)?;
    assert_eq!(p.as_leaf().map(|l| l.value()), Some("s"));

    let mut tree = Tree::new("a")?;
    let n = tree.new_node("n")?;
    let v: Box<dyn Any> = Box::new(n);
    let p = Param::try_from(v)?;
    assert_eq!(p.as_node(), Some(n));
    let root = tree.root();
    tree.add_param(root, p)?;
    assert_eq!(tree.parent(n), Some(root));
    Ok(())
}

#[test]
fn setting_a_leaf_recomputes_quoting() -> Result<()> {
    let mut tree = parse_ok("(a b \"c\")")?;
    let root = tree.root();
    let leaf = tree.leaf_mut(root, 0).ok_or_else(|| anyhow!("no leaf"))?;
    leaf.set("x y");
    assert!(leaf.is_quoted());
    let leaf = tree.leaf_mut(root, 1).ok_or_else(|| anyhow!("no leaf"))?;
    assert!(leaf.is_quoted());
    leaf.set("z");
    assert!(!leaf.is_quoted());
    assert_eq!(tree.serialize(), "(a \"x y\" z)");

    let leaf = tree.leaf_mut(root, 1).ok_or_else(|| anyhow!("no leaf"))?;
    leaf.set_quoted("z", true);
    assert_eq!(leaf.to_string(), "\"z\"");
    assert!(tree.leaf_mut(root, 2).is_none());
    Ok(())
}

#[test]
fn quoting_rule() {
    assert!(needs_quoting(""));
    assert!(needs_quoting("a b"));
    assert!(needs_quoting("a\u{2003}b"));
    assert!(needs_quoting("f(x)"));
    assert!(!needs_quoting("#$%"));
    assert!(!needs_quoting("\u{3bb}"));
}

#[test]
fn number_coercion() -> Result<()> {
    assert_eq!(parse_number("42"), Some(Number::Integer(BigInt::from(42))));
    assert_eq!(parse_number("-7"), Some(Number::Integer(BigInt::from(-7))));
    assert_eq!(parse_number("+7"), Some(Number::Integer(BigInt::from(7))));
    let big = "123456789012345678901234567890";
    assert_eq!(parse_number(big).map(|n| n.to_string()), Some(big.to_string()));
    assert_eq!(parse_number("2.5"), Some(Number::Real(2.5)));
    assert_eq!(parse_number("-.5"), Some(Number::Real(-0.5)));
    assert_eq!(parse_number("1e3"), Some(Number::Real(1000.)));
    for s in ["", "-", "abc", "inf", "NaN", "1.2.3", "12ab"] {
        assert_eq!(parse_number(s), None, "{:?}", s);
    }

    let tree = parse_ok("(a 8080 on)")?;
    let root = tree.root_node();
    assert_eq!(root.leaf(0).and_then(|l| l.as_number()),
               Some(Number::Integer(BigInt::from(8080))));
    assert_eq!(root.leaf(1).and_then(|l| l.as_number()), None);
    // the parser itself keeps strings
    assert_eq!(root.leaf(0).map(|l| l.value()), Some("8080"));
    Ok(())
}
