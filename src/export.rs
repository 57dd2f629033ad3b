//! Tree export — nested dump, JSON, and a self-contained D3 page.
//!
//! Produces the `{name, size, commission, children}` record consumed by the
//! external renderer, either as raw JSON or embedded in a collapsible D3
//! tree page that opens directly in a browser.
//!
//! ```text
//! ReferralTree → dump() → TreeDump → write_json() / write_html()
//! ```

use std::io::Write;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::model::NodeId;
use crate::tree::ReferralTree;

/// Nested export record, children in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDump {
    pub name: String,
    pub size: u64,
    pub commission: f64,
    pub children: Vec<TreeDump>,
}

/// Render the whole tree, rooted at the super-root, as a nested record.
pub fn dump(tree: &ReferralTree) -> TreeDump {
    dump_from(tree, tree.root())
}

fn dump_from(tree: &ReferralTree, id: NodeId) -> TreeDump {
    let node = tree.node(id);
    TreeDump {
        name: node.name.clone(),
        size: node.size,
        commission: node.commission,
        children: node.children.iter().map(|c| dump_from(tree, *c)).collect(),
    }
}

/// Write the tree as pretty-printed JSON.
pub fn write_json(tree: &ReferralTree, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &dump(tree))?;
    writeln!(writer)?;
    Ok(())
}

/// Write a self-contained HTML page rendering the tree as a collapsible
/// D3 layout. The dump is embedded as a JSON literal; no server required.
pub fn write_html(tree: &ReferralTree, writer: &mut dyn Write) -> Result<()> {
    let payload = serde_json::to_string(&dump(tree))?;
    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(
        writer,
        "<!-- reftree-rs referral tree, generated {} -->",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
    )?;
    writeln!(writer, "<!-- Nodes: {} -->", tree.node_count())?;
    let page = HTML_TEMPLATE.replace(TREE_DATA_SLOT, &payload);
    writer.write_all(page.as_bytes())?;
    Ok(())
}

const TREE_DATA_SLOT: &str = "/*__TREE_DATA__*/null";

const HTML_TEMPLATE: &str = r##"<html lang="en">
<head>
<meta charset="UTF-8">
<title>Referral Tree</title>
<script src="https://d3js.org/d3.v3.min.js" charset="utf-8"></script>
<style>
  .node { cursor: pointer; }
  .node circle { fill: #fff; stroke: steelblue; stroke-width: 1.5px; }
  .node text { font: 10px sans-serif; }
  .link { fill: none; stroke: #ccc; stroke-width: 1.5px; }
  .viewport { width: 100%; height: 100%; overflow: auto; }
</style>
</head>
<body>
<button onclick="expandAll()">Expand All</button>
<button onclick="collapseAll()">Collapse All</button>
<div class="viewport"><svg id="treeSVG"></svg></div>
<script>
var treeData = /*__TREE_DATA__*/null;

var margin = {top: 20, right: 120, bottom: 20, left: 220},
    width = 3000 - margin.right - margin.left,
    height = window.innerHeight * 2,
    counter = 0,
    duration = 500;

var layout = d3.layout.tree().size([height, width]);
var diagonal = d3.svg.diagonal().projection(function(d) { return [d.y, d.x]; });

var svg = d3.select("#treeSVG")
    .attr("width", width + margin.right + margin.left)
    .attr("height", height + margin.top + margin.bottom)
  .append("g")
    .attr("transform", "translate(" + margin.left + "," + margin.top + ")");

var root = treeData;
root.x0 = height / 2;
root.y0 = 0;

function collapse(d) {
  if (d.children) {
    d.children.forEach(collapse);
    d._children = d.children;
    d.children = null;
  }
}
if (root.children) root.children.forEach(collapse);
update(root);

function label(d) {
  return d.name + " (" + d.commission.toFixed(2) + ")";
}

function update(source) {
  var nodes = layout.nodes(root).reverse(),
      links = layout.links(nodes);

  nodes.forEach(function(d) { d.y = d.depth * 100; });

  var node = svg.selectAll("g.node")
      .data(nodes, function(d) { return d.id || (d.id = ++counter); });

  var nodeEnter = node.enter().append("g")
      .attr("class", "node")
      .attr("transform", function(d) { return "translate(" + source.y0 + "," + source.x0 + ")"; });

  nodeEnter.append("circle")
      .attr("r", 1e-6)
      .style("fill", function(d) { return d._children ? "lightsteelblue" : "#fff"; })
      .on("click", click);

  nodeEnter.append("text")
      .attr("x", function(d) { return d.children || d._children ? -10 : 10; })
      .attr("dy", ".35em")
      .attr("text-anchor", function(d) { return d.children || d._children ? "end" : "start"; })
      .text(label)
      .style("fill-opacity", 1e-6);

  var nodeUpdate = node.transition()
      .duration(duration)
      .attr("transform", function(d) { return "translate(" + d.y + "," + d.x + ")"; });

  nodeUpdate.select("circle")
      .attr("r", 6)
      .style("fill", function(d) { return d._children ? "lightsteelblue" : "#fff"; });

  nodeUpdate.select("text").style("fill-opacity", 1);

  node.exit().transition()
      .duration(duration)
      .attr("transform", function(d) { return "translate(" + source.y + "," + source.x + ")"; })
      .remove();

  var link = svg.selectAll("path.link")
      .data(links, function(d) { return d.target.id; });

  link.enter().insert("path", "g")
      .attr("class", "link")
      .attr("d", function(d) {
        var o = {x: source.x0, y: source.y0};
        return diagonal({source: o, target: o});
      });

  link.transition().duration(duration).attr("d", diagonal);

  link.exit().transition()
      .duration(duration)
      .attr("d", function(d) {
        var o = {x: source.x, y: source.y};
        return diagonal({source: o, target: o});
      })
      .remove();

  nodes.forEach(function(d) { d.x0 = d.x; d.y0 = d.y; });
}

function click(d) {
  if (d.children) {
    d._children = d.children;
    d.children = null;
  } else {
    d.children = d._children;
    d._children = null;
  }
  update(d);
}

function expandAll() {
  function expand(d) {
    if (d._children) { d.children = d._children; d._children = null; }
    if (d.children) d.children.forEach(expand);
  }
  expand(root);
  update(root);
}

function collapseAll() {
  if (root.children) root.children.forEach(collapse);
  update(root);
}
</script>
</body>
</html>
"##;

// ============================================================================
// Tests
// ============================================================================
