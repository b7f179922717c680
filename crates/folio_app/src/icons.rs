//! Inline SVG icons

use folio_layout::{el, ElementBuilder};

/// Icons drawn inline rather than loaded as assets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    Code,
    Rocket,
    ArrowRight,
    Project,
    Github,
    LinkedIn,
    Twitter,
    Mail,
}

/// One primitive inside an icon: tag plus attribute pairs
type Shape = (&'static str, &'static [(&'static str, &'static str)]);

impl Icon {
    pub fn element(self) -> ElementBuilder {
        let size = match self {
            Icon::Code | Icon::Rocket => "32",
            Icon::Project => "28",
            _ => "24",
        };
        let mut svg = el("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("width", size)
            .attr("height", size)
            .attr("viewBox", "0 0 24 24");

        svg = match self {
            Icon::Twitter => svg.attr("fill", "currentColor"),
            _ => {
                let stroke_width = match self {
                    Icon::Code | Icon::Rocket | Icon::Project => "1.5",
                    _ => "2",
                };
                svg.attr("fill", "none")
                    .attr("stroke", "currentColor")
                    .attr("stroke-width", stroke_width)
                    .attr("stroke-linecap", "round")
                    .attr("stroke-linejoin", "round")
            }
        };

        svg.children(self.shapes().iter().map(|(tag, attrs)| {
            attrs
                .iter()
                .fold(el(*tag), |shape, (name, value)| shape.attr(*name, *value))
        }))
    }

    fn shapes(self) -> &'static [Shape] {
        match self {
            Icon::Code => &[
                ("polyline", &[("points", "16 18 22 12 16 6")]),
                ("polyline", &[("points", "8 6 2 12 8 18")]),
            ],
            Icon::Rocket => &[
                ("path", &[("d", "M4.5 16.5c-1.5 1.26-2 5-2 5s3.74-.5 5-2c.71-.84.7-2.3.05-3.05-.64-.75-2.18-.85-3.05-.05z")]),
                ("path", &[("d", "M12 2s5 2 5 9c0 3-2 6-2 6s-3-2-6-2-6 2-6 2-2-3-2-6c0-7 5-9 5-9z")]),
                ("path", &[("d", "M12 12h.01")]),
            ],
            Icon::ArrowRight => &[
                ("line", &[("x1", "5"), ("y1", "12"), ("x2", "19"), ("y2", "12")]),
                ("polyline", &[("points", "12 5 19 12 12 19")]),
            ],
            Icon::Project => &[
                ("path", &[("d", "M21 16V8a2 2 0 0 0-1-1.73l-7-4a2 2 0 0 0-2 0l-7 4A2 2 0 0 0 3 8v8a2 2 0 0 0 1 1.73l7 4a2 2 0 0 0 2 0l7-4A2 2 0 0 0 21 16z")]),
                ("polyline", &[("points", "3.27 6.96 12 12.01 20.73 6.96")]),
                ("line", &[("x1", "12"), ("y1", "22.08"), ("x2", "12"), ("y2", "12")]),
            ],
            Icon::Github => &[
                ("path", &[("d", "M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7A5.44 5.44 0 0 0 20 4.77 5.07 5.07 0 0 0 19.91 1S18.73.65 16 2.48a13.38 13.38 0 0 0-7 0C6.27.65 5.09 1 5.09 1A5.07 5.07 0 0 0 5 4.77a5.44 5.44 0 0 0-1.5 3.78c0 5.42 3.3 6.61 6.44 7A3.37 3.37 0 0 0 9 18.13V22")]),
            ],
            Icon::LinkedIn => &[
                ("path", &[("d", "M16 8a6 6 0 0 1 6 6v7h-4v-7a2 2 0 0 0-2-2 2 2 0 0 0-2 2v7h-4v-7a6 6 0 0 1 6-6z")]),
                ("rect", &[("x", "2"), ("y", "9"), ("width", "4"), ("height", "12")]),
                ("circle", &[("cx", "4"), ("cy", "4"), ("r", "2")]),
            ],
            Icon::Twitter => &[
                ("path", &[("d", "M18.244 2.25h3.308l-7.227 8.26 8.502 11.24H16.17l-5.214-6.817L4.99 21.75H1.68l7.73-8.835L1.254 2.25H8.08l4.713 6.231zm-1.161 17.52h1.833L7.084 4.126H5.117z")]),
            ],
            Icon::Mail => &[
                ("path", &[("d", "M4 4h16c1.1 0 2 .9 2 2v12c0 1.1-.9 2-2 2H4c-1.1 0-2-.9-2-2V6c0-1.1.9-2 2-2z")]),
                ("polyline", &[("points", "22,6 12,13 2,6")]),
            ],
        }
    }
}
