use attackmap_messages::AttackEvent;
use eframe::egui::{Color32, Pos2, Response, Sense, Stroke, Ui, Vec2, Widget, pos2};
use flume::Receiver;
use std::f32::consts::PI;

use crate::buffer::Snapshot;
use crate::live_feed::to_color32;

/// Degrees per second of auto-rotation.
const ROTATION_SPEED: f32 = 3.0;
/// Latitude tilted toward the viewer.
const VIEW_TILT: f32 = 20.0;
const ARC_SEGMENTS: usize = 48;
/// Peak arc height relative to the radius, per radian of arc.
const ARC_ALTITUDE: f32 = 0.25;
const DASH_LENGTH: f32 = 0.4;
const DASH_GAP: f32 = 0.1;
const DASH_CYCLE_SECS: f64 = 1.5;
const HOVER_DISTANCE: f32 = 6.0;

type Vec3 = [f32; 3];

/// Orientation of the globe on screen.
#[derive(Debug, Clone, Copy)]
pub(crate) struct View {
    center: Pos2,
    radius: f32,
    /// Longitude facing the viewer, radians.
    lng0: f32,
    /// Latitude facing the viewer, radians.
    lat0: f32,
}

impl View {
    pub(crate) fn new(center: Pos2, radius: f32, lng0_deg: f32, lat0_deg: f32) -> Self {
        Self {
            center,
            radius,
            lng0: lng0_deg.to_radians(),
            lat0: lat0_deg.to_radians(),
        }
    }

    /// Rotate a world point into view space: x right, y up, z toward the viewer.
    fn to_view(&self, p: Vec3) -> Vec3 {
        let [x, y, z] = p;
        let (sin_l, cos_l) = self.lng0.sin_cos();
        let x1 = x * cos_l - z * sin_l;
        let z1 = x * sin_l + z * cos_l;
        let (sin_t, cos_t) = self.lat0.sin_cos();
        let y2 = y * cos_t - z1 * sin_t;
        let z2 = y * sin_t + z1 * cos_t;
        [x1, y2, z2]
    }

    /// Screen position, or `None` when hidden behind the globe.
    pub(crate) fn project(&self, p: Vec3) -> Option<Pos2> {
        let [x, y, z] = self.to_view(p);
        let outside_limb = x * x + y * y > 1.0;
        if z < 0.0 && !outside_limb {
            return None;
        }
        Some(pos2(
            self.center.x + x * self.radius,
            self.center.y - y * self.radius,
        ))
    }
}

/// Unit vector for a latitude/longitude in degrees.
pub(crate) fn unit_vector(lat_deg: f64, lng_deg: f64) -> Vec3 {
    let lat = (lat_deg as f32).to_radians();
    let lng = (lng_deg as f32).to_radians();
    [lat.cos() * lng.sin(), lat.sin(), lat.cos() * lng.cos()]
}

/// Points along the great circle from `a` to `b`, lifted into an arc.
pub(crate) fn arc_points(a: Vec3, b: Vec3, segments: usize) -> Vec<Vec3> {
    let dot = (a[0] * b[0] + a[1] * b[1] + a[2] * b[2]).clamp(-1.0, 1.0);
    let omega = dot.acos();
    let sin_omega = omega.sin();
    if sin_omega.abs() < 1e-4 {
        return vec![a, b];
    }

    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let wa = ((1.0 - t) * omega).sin() / sin_omega;
            let wb = (t * omega).sin() / sin_omega;
            let lift = 1.0 + ARC_ALTITUDE * omega * (PI * t).sin();
            [
                (wa * a[0] + wb * b[0]) * lift,
                (wa * a[1] + wb * b[1]) * lift,
                (wa * a[2] + wb * b[2]) * lift,
            ]
        })
        .collect()
}

/// Whether the position `t` along an arc falls inside a dash at `phase`.
fn in_dash(t: f32, phase: f32) -> bool {
    let period = DASH_LENGTH + DASH_GAP;
    (t - phase).rem_euclid(period) < DASH_LENGTH
}

/// Rotating globe that draws the buffered attacks as animated arcs.
///
/// The arc set is replaced wholesale whenever the event buffer publishes a
/// new snapshot.
pub struct GlobeView {
    snapshots: Receiver<Snapshot>,
    arcs: Snapshot,
}

impl GlobeView {
    pub fn new(snapshots: Receiver<Snapshot>) -> Self {
        Self {
            snapshots,
            arcs: Snapshot::from(Vec::new()),
        }
    }

    fn refresh(&mut self) {
        if let Some(latest) = self.snapshots.try_iter().last() {
            self.arcs = latest;
        }
    }

    fn draw_graticule(&self, painter: &eframe::egui::Painter, view: &View) {
        let stroke = Stroke::new(0.5, Color32::from_rgba_unmultiplied(120, 140, 180, 40));
        let draw_line = |points: Vec<Vec3>| {
            for pair in points.windows(2) {
                if let (Some(a), Some(b)) = (view.project(pair[0]), view.project(pair[1])) {
                    painter.line_segment([a, b], stroke);
                }
            }
        };
        for lng in (-180..180).step_by(30) {
            draw_line((-90..=90).step_by(5).map(|lat| unit_vector(lat as f64, lng as f64)).collect());
        }
        for lat in (-60..=60).step_by(30) {
            draw_line((-180..=180).step_by(5).map(|lng| unit_vector(lat as f64, lng as f64)).collect());
        }
    }

    /// Draw one arc and report whether the pointer is over it.
    fn draw_arc(
        &self,
        painter: &eframe::egui::Painter,
        view: &View,
        attack: &AttackEvent,
        phase: f32,
        pointer: Option<Pos2>,
    ) -> bool {
        let color = to_color32(attack);
        let source = unit_vector(attack.source().lat, attack.source().lng);
        let destination = unit_vector(attack.destination().lat, attack.destination().lng);
        let points = arc_points(source, destination, ARC_SEGMENTS);
        let faint = Stroke::new(0.5, color.gamma_multiply(0.25));
        let dash = Stroke::new(1.5, color);
        let mut hovered = false;

        let last = (points.len() - 1).max(1) as f32;
        for (i, pair) in points.windows(2).enumerate() {
            let (Some(a), Some(b)) = (view.project(pair[0]), view.project(pair[1])) else {
                continue;
            };
            let t = (i as f32 + 0.5) / last;
            painter.line_segment([a, b], if in_dash(t, phase) { dash } else { faint });
            if let Some(p) = pointer {
                hovered |= p.distance(a) < HOVER_DISTANCE;
            }
        }

        for end in [source, destination] {
            if let Some(p) = view.project(end) {
                painter.circle_filled(p, 2.0, color);
            }
        }
        hovered
    }
}

impl Widget for &mut GlobeView {
    fn ui(self, ui: &mut Ui) -> Response {
        self.refresh();

        let size = ui.available_size().max(Vec2::splat(64.0));
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        let time = ui.input(|i| i.time);

        let view = View::new(
            rect.center(),
            rect.width().min(rect.height()) * 0.42,
            -(time as f32 * ROTATION_SPEED) % 360.0,
            VIEW_TILT,
        );

        painter.circle_filled(view.center, view.radius, Color32::from_rgb(8, 18, 40));
        self.draw_graticule(&painter, &view);
        painter.circle_stroke(
            view.center,
            view.radius,
            Stroke::new(1.0, Color32::from_rgb(40, 70, 120)),
        );

        let phase = ((time / DASH_CYCLE_SECS).fract() as f32) * (DASH_LENGTH + DASH_GAP);
        let pointer = response.hover_pos();
        let mut hovered_label = None;
        for attack in self.arcs.iter() {
            if self.draw_arc(&painter, &view, attack, phase, pointer) && hovered_label.is_none() {
                hovered_label = Some(attack.label());
            }
        }

        match hovered_label {
            Some(label) => response.on_hover_text_at_pointer(label),
            None => response,
        }
    }
}
