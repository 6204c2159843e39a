// Drawing of the sociogram with plotters.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::survey::io_common::has_extension;
use crate::survey::*;
use std::path::Path;

const SIZE: (u32, u32) = (1000, 800);
const MARGIN: f64 = 70.0;
const NODE_RADIUS: f64 = 22.0;
const ARROW_LENGTH: f64 = 14.0;
const ARROW_WIDTH: f64 = 6.0;
const EDGE_COLOR: RGBColor = RGBColor(150, 150, 150);

type Pixel = (i32, i32);

/// A line between two nodes, stopped at the border of both circles, with an
/// arrowhead at the target.
#[derive(Debug, PartialEq)]
struct Arrow {
    start: Pixel,
    end: Pixel,
    head: [Pixel; 3],
}

/// Maps a layout position (within [-1, 1] on both axes) to a pixel.
/// The y axis points up in the layout and down in the image.
fn to_pixel(p: &Position, size: (u32, u32)) -> (f64, f64) {
    let w = size.0 as f64 - 2.0 * MARGIN;
    let h = size.1 as f64 - 2.0 * MARGIN;
    let x = MARGIN + (p.x + 1.0) / 2.0 * w;
    let y = MARGIN + (1.0 - p.y) / 2.0 * h;
    (x, y)
}

fn round(p: (f64, f64)) -> Pixel {
    (p.0.round() as i32, p.1.round() as i32)
}

fn arrow_geometry(from: (f64, f64), to: (f64, f64), radius: f64) -> Option<Arrow> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let dist = (dx * dx + dy * dy).sqrt();
    if dist <= 2.0 * radius {
        return None;
    }
    let (ux, uy) = (dx / dist, dy / dist);
    let start = (from.0 + ux * radius, from.1 + uy * radius);
    let tip = (to.0 - ux * radius, to.1 - uy * radius);
    let base = (tip.0 - ux * ARROW_LENGTH, tip.1 - uy * ARROW_LENGTH);
    // Perpendicular to the edge.
    let (px, py) = (-uy * ARROW_WIDTH, ux * ARROW_WIDTH);
    Some(Arrow {
        start: round(start),
        end: round(base),
        head: [
            round(tip),
            round((base.0 + px, base.1 + py)),
            round((base.0 - px, base.1 - py)),
        ],
    })
}

fn draw_sociogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    graph: &PositionedGraph,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let size = root.dim_in_pixel();

    // Edges first so that the nodes are drawn over them.
    for (from, to) in graph.directed_edges.iter() {
        if from == to {
            continue;
        }
        let (a, b) = match (graph.node(from), graph.node(to)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                warn!("draw_sociogram: skipping edge {} -> {}", from, to);
                continue;
            }
        };
        let geometry = arrow_geometry(
            to_pixel(&a.position, size),
            to_pixel(&b.position, size),
            NODE_RADIUS,
        );
        if let Some(arrow) = geometry {
            root.draw(&PathElement::new(
                vec![arrow.start, arrow.end],
                EDGE_COLOR.stroke_width(2),
            ))?;
            root.draw(&Polygon::new(arrow.head.to_vec(), EDGE_COLOR.filled()))?;
        }
    }

    let label_style = ("sans-serif", 14)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for node in graph.nodes.iter() {
        let center = round(to_pixel(&node.position, size));
        let (r, g, b) = node.color.rgb;
        root.draw(&Circle::new(
            center,
            NODE_RADIUS as i32,
            RGBColor(r, g, b).filled(),
        ))?;
        root.draw(&Circle::new(center, NODE_RADIUS as i32, BLACK.stroke_width(1)))?;
        root.draw(&Text::new(
            node.label.clone(),
            (center.0, center.1 + NODE_RADIUS as i32 + 4),
            label_style.clone(),
        ))?;
    }
    root.present()?;
    Ok(())
}

/// Draws the sociogram to a PNG file, or an SVG file if the path ends with `.svg`.
pub fn save_sociogram(path: &Path, graph: &PositionedGraph) -> SurveyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    let is_svg = has_extension(path, "svg");
    debug!(
        "save_sociogram: {} nodes, {} edges to {:?} (svg: {})",
        graph.nodes.len(),
        graph.directed_edges.len(),
        path,
        is_svg
    );
    let res = if is_svg {
        let root = SVGBackend::new(path, SIZE).into_drawing_area();
        draw_sociogram(&root, graph).map_err(|e| Box::new(e) as BoxedError)
    } else {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        draw_sociogram(&root, graph).map_err(|e| Box::new(e) as BoxedError)
    };
    res.context(RenderingSnafu {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_mapping() {
        let size = (1000, 800);
        assert_eq!(to_pixel(&Position { x: -1.0, y: 1.0 }, size), (70.0, 70.0));
        assert_eq!(to_pixel(&Position { x: 1.0, y: -1.0 }, size), (930.0, 730.0));
        assert_eq!(to_pixel(&Position { x: 0.0, y: 0.0 }, size), (500.0, 400.0));
    }

    #[test]
    fn horizontal_arrow() {
        let arrow = arrow_geometry((100.0, 100.0), (300.0, 100.0), 20.0).unwrap();
        assert_eq!(arrow.start, (120, 100));
        assert_eq!(arrow.end, (266, 100));
        assert_eq!(arrow.head, [(280, 100), (266, 106), (266, 94)]);
    }

    fn small_graph() -> PositionedGraph {
        let mut builder = sociometry::builder::Builder::new();
        builder.add_response_simple("Alice", &["Bob"]).unwrap();
        builder.add_response_simple("Bob", &["Carol"]).unwrap();
        builder.add_response_simple("Carol", &["Carol"]).unwrap();
        let agg = builder.aggregate();
        layout::build(&agg.edges, &agg.roster, &LayoutConfig::DEFAULT_LAYOUT)
    }

    #[test]
    fn png_and_svg_files() {
        let dir = std::env::temp_dir().join(format!("sosiogram-render-{}", std::process::id()));
        let graph = small_graph();
        for name in ["sosiogram.png", "gambar/sosiogram.SVG"] {
            let path = dir.join(name);
            save_sociogram(&path, &graph).unwrap();
            let size = fs::metadata(&path).unwrap().len();
            assert!(size > 0, "{} is empty", name);
        }
        let svg = fs::read_to_string(dir.join("gambar/sosiogram.SVG")).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn empty_graph() {
        let path = std::env::temp_dir()
            .join(format!("sosiogram-render-empty-{}", std::process::id()))
            .join("kosong.png");
        save_sociogram(&path, &PositionedGraph::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn drawing_error_keeps_its_cause() {
        // A directory cannot be written as an image.
        let path = std::env::temp_dir()
            .join(format!("sosiogram-render-dir-{}", std::process::id()))
            .join("gambar.png");
        fs::create_dir_all(&path).unwrap();
        let err = save_sociogram(&path, &small_graph()).unwrap_err();
        assert!(matches!(err, SurveyError::Rendering { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn overlapping_nodes() {
        assert_eq!(arrow_geometry((100.0, 100.0), (130.0, 100.0), 20.0), None);
        assert_eq!(arrow_geometry((100.0, 100.0), (100.0, 100.0), 20.0), None);
    }
}
