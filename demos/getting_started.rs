use geonav::{Config, GeoBox, KdTree, Point, RasterRequest, SolverOutcome, StreetGraph, TileResolver};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== geonav - Getting Started ===\n");

    // === NEAREST POINT ===
    println!("1. Nearest Point Lookup");
    println!("-----------------------");

    let landmarks = KdTree::from_entries([
        (Point::new(-122.2585, 37.8719), "Sather Tower"),
        (Point::new(-122.2681, 37.8700), "Downtown Berkeley BART"),
        (Point::new(-122.2509, 37.8555), "Claremont"),
    ])?;
    let nearest = landmarks.nearest_entry(-122.2600, 37.8710);
    println!(
        "   Closest landmark to (-122.2600, 37.8710): {} at {:.5} degrees\n",
        nearest.value, nearest.distance
    );

    // === ROUTING ===
    println!("2. Street Routing");
    println!("-----------------");

    let graph = StreetGraph::builder()
        .named_node(1, -122.2681, 37.8700, "Shattuck & Center")
        .named_node(2, -122.2662, 37.8700, "Center & Oxford")
        .named_node(3, -122.2662, 37.8719, "Oxford & University")
        .named_node(4, -122.2585, 37.8719, "Sather Gate")
        .way(&[1, 2, 3, 4])
        .one_way(&[1, 4])
        .build()?;

    let route = graph.shortest_path_within(
        -122.2681,
        37.8700,
        -122.2585,
        37.8719,
        Duration::from_millis(500),
    )?;
    match route.outcome() {
        SolverOutcome::Solved => {
            let names: Vec<&str> = route
                .solution()
                .iter()
                .filter_map(|id| graph.node(*id).and_then(|n| n.name.as_deref()))
                .collect();
            println!("   Route: {}", names.join(" -> "));
            println!("   Length: {:.0} m", route.solution_weight());
        }
        outcome => println!("   No route: {:?}", outcome),
    }
    println!(
        "   Explored {} states in {:?}\n",
        route.num_states_explored(),
        route.exploration_time()
    );

    // === TILES ===
    println!("3. Raster Tiles");
    println!("---------------");

    let resolver = TileResolver::new(&Config::default())?;
    let request = RasterRequest::new(GeoBox::new(-122.27, 37.875, -122.25, 37.865), 1024.0, 512.0);
    let raster = resolver.resolve(&request)?;
    println!(
        "   Depth {} grid of {}x{} tiles",
        raster.depth,
        raster.cols(),
        raster.rows()
    );
    for row in &raster.render_grid {
        println!("   {}", row.join(" "));
    }
    println!("\n   JSON: {}", serde_json::to_string(&raster)?);

    Ok(())
}
