//! Example: Laying out a flowchart built from the semantic model
//!
//! Builds a small flowchart in code, prints its levels, and writes the
//! static export to `water_cycle.svg` and `water_cycle.png`.

use std::fs;

use treeflow::{
    FlowchartBuilder,
    export::file_name_for_title,
    semantic::{Flowchart, FlowchartNode},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let flowchart = Flowchart::new(
        "Water Cycle",
        vec![
            FlowchartNode::new("Evaporation", vec![1]),
            FlowchartNode::new("Condensation", vec![2]),
            FlowchartNode::new("Precipitation", vec![3, 4]),
            FlowchartNode::leaf("Runoff"),
            FlowchartNode::new("Infiltration", vec![0]),
        ],
    );

    let builder = FlowchartBuilder::default();
    let layout = builder.layout(&flowchart)?;

    for node in layout.nodes() {
        println!(
            "{:>2} level {} at ({:.0}, {:.0}) {}",
            node.id(),
            node.level(),
            node.position().x(),
            node.position().y(),
            node.label()
        );
    }
    println!("{} edges", layout.edges().len());

    fs::write("water_cycle.svg", builder.render_svg(&flowchart)?)?;

    let png_name = file_name_for_title(flowchart.title());
    fs::write(&png_name, builder.render_png(&flowchart)?)?;
    println!("Wrote water_cycle.svg and {png_name}");

    Ok(())
}
