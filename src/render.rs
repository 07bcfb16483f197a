use iced::canvas::{Frame, Path, Stroke};
use iced::{Color, Point};

use crate::config::Parameters;
use crate::field::Field;

/// Anything the particle network can be painted onto.
pub trait Surface {
    fn clear(&mut self);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Dot {
        center: Point,
        radius: f32,
        color: Color,
    },
    Edge {
        from: Point,
        to: Point,
        width: f32,
        color: Color,
    },
}

/// Recording surface. Filled once per frame, replayed by the canvas on draw.
#[derive(Debug, Default)]
pub struct DisplayList {
    shapes: Vec<Shape>,
}

impl DisplayList {
    #[cfg(test)]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn replay(&self, frame: &mut Frame, background: Color) {
        let backdrop = Path::rectangle(Point::ORIGIN, frame.size());
        frame.fill(&backdrop, background);

        for shape in self.shapes.iter() {
            match *shape {
                Shape::Dot {
                    center,
                    radius,
                    color,
                } => frame.fill(&Path::circle(center, radius), color),
                Shape::Edge {
                    from,
                    to,
                    width,
                    color,
                } => frame.stroke(
                    &Path::line(from, to),
                    Stroke::default().with_color(color).with_width(width),
                ),
            }
        }
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.shapes.push(Shape::Dot {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, color: Color) {
        self.shapes.push(Shape::Edge {
            from,
            to,
            width,
            color,
        });
    }
}

/// Opacity of the edge between two particles `distance` apart: linear from
/// `max_edge_alpha` at contact down to zero at the connection radius.
pub fn edge_alpha(distance: f32, parameters: &Parameters) -> f32 {
    ((1.0 - distance / parameters.connection_radius) * parameters.max_edge_alpha).max(0.0)
}

/// Draws every particle, then every edge shorter than the connection radius.
/// Pairs are visited once, `i < j` in population order.
pub fn paint<S: Surface + ?Sized>(field: &Field, parameters: &Parameters, surface: &mut S) {
    let particles = field.particles();

    for p in particles.iter() {
        surface.fill_circle(Point::new(p.x, p.y), p.radius, parameters.color(p.base_alpha));
    }

    for (i, p1) in particles.iter().enumerate() {
        for p2 in particles[i + 1..].iter() {
            let dx = p1.x - p2.x;
            let dy = p1.y - p2.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance < parameters.connection_radius {
                surface.stroke_line(
                    Point::new(p1.x, p1.y),
                    Point::new(p2.x, p2.y),
                    parameters.edge_width,
                    parameters.color(edge_alpha(distance, parameters)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Particle;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            x,
            y,
            radius: 1.0,
            base_alpha: 0.25,
            ..Default::default()
        }
    }

    fn edges(list: &DisplayList) -> Vec<f32> {
        list.shapes()
            .iter()
            .filter_map(|s| match s {
                Shape::Edge { color, .. } => Some(color.a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn edge_alpha_endpoints() {
        let parameters = Parameters::default();
        assert_eq!(edge_alpha(150.0, &parameters), 0.0);
        assert_eq!(edge_alpha(0.0, &parameters), 0.15);
    }

    #[test]
    fn edge_alpha_strictly_decreasing() {
        let parameters = Parameters::default();
        let mut last = edge_alpha(0.0, &parameters);
        for d in 1..150 {
            let alpha = edge_alpha(d as f32, &parameters);
            assert!(alpha < last, "alpha at {} did not decrease", d);
            assert!(alpha > 0.0);
            last = alpha;
        }
    }

    #[test]
    fn no_edge_at_connection_radius() {
        let parameters = Parameters::default();
        let field = Field::from_particles(vec![at(0.0, 0.0), at(150.0, 0.0)]);
        let mut list = DisplayList::default();
        paint(&field, &parameters, &mut list);
        assert_eq!(list.shapes().len(), 2);
        assert!(edges(&list).is_empty());
    }

    #[test]
    fn dots_carry_base_alpha() {
        let parameters = Parameters::default();
        let field = Field::from_particles(vec![at(10.0, 20.0)]);
        let mut list = DisplayList::default();
        paint(&field, &parameters, &mut list);
        match &list.shapes()[0] {
            Shape::Dot {
                center,
                radius,
                color,
            } => {
                assert_eq!(*center, Point::new(10.0, 20.0));
                assert_eq!(*radius, 1.0);
                assert_eq!(color.a, 0.25);
            }
            other => panic!("expected a dot, got {:?}", other),
        }
    }

    #[test]
    fn each_close_pair_drawn_once() {
        let parameters = Parameters::default();
        let field =
            Field::from_particles(vec![at(0.0, 0.0), at(10.0, 0.0), at(20.0, 0.0), at(500.0, 0.0)]);
        let mut list = DisplayList::default();
        paint(&field, &parameters, &mut list);
        assert_eq!(edges(&list).len(), 3);
    }

    #[test]
    fn clear_drops_previous_frame() {
        let parameters = Parameters::default();
        let field = Field::from_particles(vec![at(0.0, 0.0), at(100.0, 0.0)]);
        let mut list = DisplayList::default();
        paint(&field, &parameters, &mut list);
        list.clear();
        paint(&field, &parameters, &mut list);
        assert_eq!(list.shapes().len(), 3);
    }
}
