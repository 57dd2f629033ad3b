//! End-to-end export: log text → simulation → JSON / HTML artifacts.

use reftree_rs::{
    ProbabilitySource, ROOT_NAME, Simulation, SimulationConfig, TreeBuilder, TreeDump,
    export, loader,
};

struct Forced(f64);

impl ProbabilitySource for Forced {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

const LOG: &str = "\
life_app_ref_code,life_app_personal_ref_code
a,b
a,c
b,d
";

#[test]
fn test_log_to_json_pipeline() {
    let records = loader::parse_log(LOG).unwrap();
    let sim = Simulation::new(SimulationConfig::default()).unwrap();
    let run = sim.run_seeded(&records, 5).unwrap();

    let mut buf = Vec::new();
    export::write_json(&run.tree, &mut buf).unwrap();
    let parsed: TreeDump = serde_json::from_slice(&buf).unwrap();

    assert_eq!(parsed.name, ROOT_NAME);
    assert_eq!(parsed.size, 5, "4 participants + super-root");
    assert_eq!(parsed.children.len(), 1);
    let a = &parsed.children[0];
    assert_eq!(a.name, "a");
    let names: Vec<&str> = a.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"], "dump keeps insertion order");
}

#[test]
fn test_dump_carries_commissions() {
    let records = loader::parse_log(LOG).unwrap();
    let config = SimulationConfig::default();
    let mut sampler = Forced(0.0);
    let run = TreeBuilder::new(&config).build(&records, &mut sampler).unwrap();

    let dumped = export::dump(&run.tree);
    let total: f64 = flatten(&dumped).iter().map(|n| n.commission).sum();
    let in_tree: f64 = run.tree.iter().map(|n| n.commission).sum();
    assert_eq!(total, in_tree, "dump must carry every commission");
    assert!(total > 0.0);
}

#[test]
fn test_html_page_is_self_contained() {
    let records = loader::parse_log(LOG).unwrap();
    let sim = Simulation::new(SimulationConfig::default()).unwrap();
    let run = sim.run_seeded(&records, 5).unwrap();

    let mut buf = Vec::new();
    export::write_html(&run.tree, &mut buf).unwrap();
    let page = String::from_utf8(buf).unwrap();

    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<!-- Nodes: 5 -->"));
    assert!(page.contains("var treeData = {"), "dump must be inlined as a literal");
    assert!(page.contains("\"GENESIS\""));
    assert!(page.contains("d3.layout.tree"));
}

fn flatten(dump: &TreeDump) -> Vec<&TreeDump> {
    let mut all = vec![dump];
    for child in &dump.children {
        all.extend(flatten(child));
    }
    all
}
