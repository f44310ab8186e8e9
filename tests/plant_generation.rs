use pvtree::assembly::{Assembler, AssemblyConfig, MaterialSummary};
use pvtree::core::logging;
use pvtree::leaf::LeafBuilder;
use pvtree::species::{LeafSpecies, LeafSystem, Registry, TreeSpecies, TreeSystem};
use pvtree::turtle::{Turtle, TurtleId};

fn small_tree(species: TreeSpecies, generations: i64) -> TreeSystem {
    let mut tree = TreeSystem::new(species);
    tree.parameters_mut().set_integer("iterationNumber", generations);
    tree
}

fn quick_config(seed: u64) -> AssemblyConfig {
    AssemblyConfig { resolution: 100, ..AssemblyConfig::seeded(seed) }
}

#[test]
fn test_registry_builds_unexpanded_cordate() {
    let mut leaf = Registry::leaves().create("cordate").unwrap();
    leaf.parameters_mut().set_integer("iterationNumber", 0);
    assert_eq!(leaf.expand().unwrap().rules, "/(90)G(0)[A(1)][B(1)]");
}

#[test]
fn test_randomized_parameters_repeat_for_a_seed() {
    let mut a = TreeSystem::new(TreeSpecies::Sympodial);
    let mut b = TreeSystem::new(TreeSpecies::Sympodial);
    a.parameters_mut().randomize_parameters(99);
    b.parameters_mut().randomize_parameters(99);
    assert_eq!(a, b);
    assert_eq!(a.expand().unwrap().rules, b.expand().unwrap().rules);
}

/// Each retired turtle as (parent, children), written as positions in retirement order.
fn topology(grown: &pvtree::lsystem::Interpretation) -> Vec<(Option<usize>, Vec<usize>)> {
    let order = |id: TurtleId| grown.retired.iter().position(|r| *r == id);
    grown
        .retired
        .iter()
        .filter_map(|id| grown.turtle(*id))
        .map(|turtle| {
            let parent = turtle.parent().and_then(order);
            let children = turtle.children().iter().filter_map(|c| order(*c)).collect();
            (parent, children)
        })
        .collect()
}

#[test]
fn test_stochastic_tree_grows_the_same_forest_twice() {
    let tree = small_tree(TreeSpecies::Stochastic, 4);
    let first = tree.grow().unwrap();
    let second = tree.grow().unwrap();

    assert!(!first.retired.is_empty());
    assert_eq!(first.retired.len(), second.retired.len());
    assert_eq!(topology(&first), topology(&second));
    assert_eq!(first.roots().count(), second.roots().count());

    let positions = |grown: &pvtree::lsystem::Interpretation| -> Vec<_> {
        grown.retired.iter().filter_map(|id| grown.turtle(*id)).map(|t| t.position).collect()
    };
    assert_eq!(positions(&first), positions(&second));
}

#[test]
fn test_every_tree_grows() {
    for species in TreeSpecies::ALL {
        let grown = small_tree(species, 2).grow().unwrap();
        assert!(!grown.retired.is_empty(), "{species}");
        assert!(grown.roots().count() >= 1, "{species}");
    }
}

#[test]
fn test_every_leaf_builds_all_layers() {
    for species in LeafSpecies::ALL {
        let builder = LeafBuilder::new(&LeafSystem::new(species)).unwrap();
        let shells = builder.shells(&Turtle::default()).unwrap();
        assert!(!shells.envelope.is_empty(), "{species}");
        assert!(!shells.sensitive.is_empty(), "{species}");
        assert!(shells.sensitive_area > 0.0, "{species}");
        assert_eq!(shells.front.facets().len(), shells.back.facets().len(), "{species}");
    }
}

#[test]
fn test_candidate_leaves_follow_branch_topology() {
    logging::init_for_tests();
    let tree = small_tree(TreeSpecies::Ternary, 2);
    let leaf = LeafSystem::new(LeafSpecies::Simple);
    let config = quick_config(4);
    let thin = config.thin_branch_half_width;
    let structure = Assembler::new(config).build(&tree, &leaf).unwrap();

    let grown = tree.grow().unwrap();
    let expected: usize = grown
        .retired
        .iter()
        .filter_map(|id| grown.turtle(*id))
        .map(|turtle| match (turtle.is_terminal(), turtle.width / 2.0 < thin) {
            (true, _) => 3,
            (false, true) => 2,
            (false, false) => 0,
        })
        .sum();

    assert_eq!(structure.metrics.branch_count, grown.retired.len());
    assert_eq!(structure.metrics.candidate_leaf_count(), expected);
    assert_eq!(structure.named("LeafEnvelope").count(), structure.metrics.leaf_count);
}

#[test]
fn test_seeded_assembly_is_repeatable() {
    let tree = small_tree(TreeSpecies::Monopodial, 2);
    let leaf = LeafSystem::new(LeafSpecies::Cordate);
    let first = Assembler::new(quick_config(21)).build(&tree, &leaf).unwrap();
    let second = Assembler::new(quick_config(21)).build(&tree, &leaf).unwrap();
    assert_eq!(first.metrics, second.metrics);

    let mut summary = MaterialSummary::default();
    first.emit(&mut summary);
    assert_eq!(summary.volumes.get("pv-aluminium").copied(), Some(first.metrics.branch_count));
    assert_eq!(summary.volumes.get("pv-silicon").copied().unwrap_or(0), first.metrics.leaf_count);
}

#[test]
fn test_saved_systems_assemble_identically() {
    let dir = tempfile::tempdir().unwrap();
    let tree_path = dir.path().join("tree.json");
    let leaf_path = dir.path().join("leaf.json");

    let tree = small_tree(TreeSpecies::Stump, 0);
    let leaf = LeafSystem::new(LeafSpecies::Rose);
    tree.save(&tree_path).unwrap();
    leaf.save(&leaf_path).unwrap();

    let tree_back = TreeSystem::load(&tree_path).unwrap();
    let leaf_back = LeafSystem::load(&leaf_path).unwrap();
    assert_eq!(tree_back, tree);
    assert_eq!(leaf_back, leaf);

    let fresh = Assembler::new(quick_config(8)).build(&tree, &leaf).unwrap();
    let reloaded = Assembler::new(quick_config(8)).build(&tree_back, &leaf_back).unwrap();
    assert_eq!(fresh.metrics, reloaded.metrics);
}
