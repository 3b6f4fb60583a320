use crate::controller::{Command, Sample};
use crate::diagnostics::{MembershipSnapshot, VariableSnapshot};
use crate::variable::Role;
use std::fmt::Write;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 320.0;
const MARGIN: f64 = 40.0;
const COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#9467bd", "#8c564b", "#17becf",
];

pub fn render_text(sample: &Sample, command: &Command, snapshot: &MembershipSnapshot) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "Fuzzy controller report");
    let _ = writeln!(s, "=======================");
    let _ = writeln!(s, "Inputs:");
    let _ = writeln!(s, "    curve: {:.2}", sample.curve);
    let _ = writeln!(s, "    wall_distance: {:.2}", sample.wall_distance);
    if let Some(target_distance) = sample.target_distance {
        let _ = writeln!(s, "    target_distance: {:.2}", target_distance);
    }
    let _ = writeln!(s);
    let _ = writeln!(s, "Outputs:");
    for output in snapshot.outputs() {
        let _ = writeln!(s, "    {}: {:.2}", output.name, output.value);
    }
    let _ = writeln!(
        s,
        "    command: turn {}, speed delta {:.2}",
        command.turn.name(),
        command.speed_delta
    );
    if snapshot.probed {
        let _ = writeln!(s, "    (no rule fired at the sample, neighbours probed)");
        let _ = writeln!(
            s,
            "    (outputs average the neighbour centroids; plots show their strongest activation)"
        );
    }
    let _ = writeln!(s);
    let _ = writeln!(s, "Membership:");
    for input in snapshot.inputs() {
        let _ = writeln!(s, "    {}:", input.name);
        for (label, degree) in input.degrees.iter() {
            let _ = writeln!(s, "        {}: {:.2}", label, degree);
        }
    }
    let _ = writeln!(s);
    let _ = writeln!(s, "Activation:");
    for output in snapshot.outputs() {
        let _ = writeln!(s, "    {}:", output.name);
        for (label, level) in output.degrees.iter() {
            let _ = writeln!(s, "        {}: {:.2}", label, level);
        }
    }
    s
}

/// Plots every set of a variable, marks the current value and shades the
/// aggregated curve of outputs.
pub fn render_svg(variable: &VariableSnapshot) -> String {
    let universe = variable.universe;
    let sx = |x: f64| {
        MARGIN + (x - universe.min) / (universe.max - universe.min) * (WIDTH - 2.0 * MARGIN)
    };
    let sy = |y: f64| HEIGHT - MARGIN - y * (HEIGHT - 2.0 * MARGIN);
    let points = universe.points();

    let mut s = String::new();
    let _ = writeln!(
        s,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = writeln!(s, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let title = match variable.role {
        Role::Antecedent => format!("{} = {:.2}", variable.name, variable.value),
        Role::Consequent => format!("{} (crisp {:.2})", variable.name, variable.value),
    };
    let _ = writeln!(
        s,
        r#"<text x="{}" y="{}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        MARGIN / 2.0,
        title
    );

    if variable.aggregated.len() > 1 {
        let mut polygon = format!("{:.2},{:.2}", sx(variable.aggregated[0].0), sy(0.0));
        for &(x, y) in variable.aggregated.iter() {
            let _ = write!(polygon, " {:.2},{:.2}", sx(x), sy(y));
        }
        if let Some(&(x, _)) = variable.aggregated.last() {
            let _ = write!(polygon, " {:.2},{:.2}", sx(x), sy(0.0));
        }
        let _ = writeln!(
            s,
            r##"<polygon points="{polygon}" fill="#d62728" fill-opacity="0.3" stroke="none"/>"##
        );
    }

    for (i, set) in variable.sets.iter().enumerate() {
        let color = COLORS[i % COLORS.len()];
        let path = points
            .iter()
            .map(|&x| format!("{:.2},{:.2}", sx(x), sy(set.shape.degree(x))))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            s,
            r#"<polyline points="{path}" fill="none" stroke="{color}" stroke-width="2"/>"#
        );
        let _ = writeln!(
            s,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="11" fill="{color}" text-anchor="middle">{}</text>"#,
            sx(set.shape.peak(universe.min, universe.max)),
            sy(1.0) - 4.0 - 12.0 * (i % 2) as f64,
            set.label
        );
    }

    let _ = writeln!(
        s,
        r#"<line x1="{MARGIN}" y1="{0:.2}" x2="{1:.2}" y2="{0:.2}" stroke="black"/>"#,
        sy(0.0),
        WIDTH - MARGIN
    );
    for x in [universe.min, universe.max] {
        let _ = writeln!(
            s,
            r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="11" text-anchor="middle">{}</text>"#,
            sx(x),
            sy(0.0) + 16.0,
            x
        );
    }

    let marker = sx(universe.clamp(variable.value));
    let _ = writeln!(
        s,
        r#"<line x1="{marker:.2}" y1="{:.2}" x2="{marker:.2}" y2="{:.2}" stroke="black" stroke-width="2" stroke-dasharray="6,4"/>"#,
        sy(0.0),
        sy(1.0)
    );
    let _ = writeln!(s, "</svg>");
    s
}
