//! Produce, distribute, export: the whole pipeline on small drawings.

use std::sync::Arc;
use std::thread;

use penplot::{
    export_gcode, Canvas, DistributionOrder, Drawing, GCodeSettings, Geometry, Path, Pen, PenSet, Point, Producer,
    SharedDrawing,
};

fn stroke(i: usize) -> Geometry {
    let x = i as f64 * 10.0;
    Geometry::new(Path::from_polyline(&[Point::new(x, 0.0), Point::new(x, 50.0)], false), 0)
}

fn two_pens() -> Arc<PenSet> {
    Arc::new(
        PenSet::new(
            "duo",
            vec![Pen::new("first", 0xff000000).with_weight(50), Pen::new("second", 0xff000000).with_weight(50)],
        )
        .with_order(DistributionOrder::Displayed),
    )
}

/// Lines between a `(Start Layer: name)` comment and its `(End Layer: name)`.
fn layer<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let start = format!("(Start Layer: {name})");
    let end = format!("(End Layer: {name})");
    text.lines().skip_while(|l| *l != start).skip(1).take_while(|l| *l != end).collect()
}

#[test]
fn two_pens_ten_geometries() {
    let mut drawing = Drawing::new(two_pens(), Arc::new(Producer::new("lines")));
    for i in 0..10 {
        drawing.append(stroke(i));
    }
    drawing.update_pen_distribution();

    let pens: Vec<Option<usize>> = drawing.geometries().iter().map(Geometry::pen_index).collect();
    assert_eq!(&pens[..5], &[Some(0); 5]);
    assert_eq!(&pens[5..], &[Some(1); 5]);

    let mut out = Vec::new();
    let report = export_gcode(&drawing, &Canvas::default(), &GCodeSettings::default(), &mut out, &mut ()).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(report.layers, 2);
    assert_eq!(report.geometries, 10);

    // Render order reverses the displayed order.
    let second_at = text.find("(Start Layer: second)").unwrap();
    let first_at = text.find("(Start Layer: first)").unwrap();
    assert!(second_at < first_at);

    for name in ["first", "second"] {
        let lines = layer(&text, name);
        assert_eq!(lines.iter().filter(|l| l.starts_with("G0 X")).count(), 5, "{name}");
        assert_eq!(lines.iter().filter(|l| **l == "G1 Z0").count(), 5, "{name}");
        assert_eq!(lines.iter().filter(|l| **l == "G0 Z1").count(), 5, "{name}");
        assert_eq!(lines.last(), Some(&"G0 Z1"));
    }

    // First geometry of pen "first" is image x=0, drawn from the bottom edge up.
    let first = layer(&text, "first");
    assert_eq!(first[0], "G0 X0.000 Y297.000");
    assert_eq!(first[2], "G1 X0.000 Y247.000");
}

#[test]
fn background_production_then_export() {
    let shared = SharedDrawing::new(Drawing::new(two_pens(), Arc::new(Producer::new("lines"))));

    let worker = {
        let shared = shared.clone();
        thread::spawn(move || {
            for i in 0..40 {
                shared.append(stroke(i));
            }
        })
    };
    // Preview while producing.
    let _ = shared.read().geometry_count();
    worker.join().unwrap();

    let mut drawing = shared.into_inner().ok().expect("no other handles");
    drawing.update_pen_distribution();
    let stats = drawing.pen_stats();
    assert_eq!(stats.iter().map(|s| s.geometries).collect::<Vec<_>>(), vec![20, 20]);

    let mut out = Vec::new();
    let report = export_gcode(&drawing, &Canvas::default(), &GCodeSettings::default(), &mut out, &mut ()).unwrap();
    assert_eq!(report.geometries, 40);
}
