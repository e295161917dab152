use kurbo::Shape;

use crate::foundation::core::{BBox, BezPath, Point, Rect};
use crate::scene::document::Document;
use crate::scene::node::NodeId;

fn points_rect(list: &str) -> Option<Rect> {
    let nums: Vec<f64> = list
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    nums.chunks_exact(2)
        .map(|p| Point::new(p[0], p[1]))
        .fold(None, |acc: Option<Rect>, p| {
            Some(match acc {
                Some(r) => r.union_pt(p),
                None => Rect::from_points(p, p),
            })
        })
}

impl Document {
    fn num(&self, id: NodeId, name: &str) -> f64 {
        self.attr_f64(id, name).unwrap_or(0.0)
    }

    /// Own geometry of a shape element in its local user space.
    fn shape_rect(&self, id: NodeId, tag: &str) -> Option<Rect> {
        match tag {
            "rect" | "image" | "foreignObject" => {
                let (x, y) = (self.num(id, "x"), self.num(id, "y"));
                let (w, h) = (self.num(id, "width"), self.num(id, "height"));
                Some(Rect::new(x, y, x + w.max(0.0), y + h.max(0.0)))
            }
            "circle" => {
                let c = Point::new(self.num(id, "cx"), self.num(id, "cy"));
                Some(kurbo::Circle::new(c, self.num(id, "r").max(0.0)).bounding_box())
            }
            "ellipse" => {
                let c = Point::new(self.num(id, "cx"), self.num(id, "cy"));
                let radii = (self.num(id, "rx").max(0.0), self.num(id, "ry").max(0.0));
                Some(kurbo::Ellipse::new(c, radii, 0.0).bounding_box())
            }
            "line" => {
                let p0 = Point::new(self.num(id, "x1"), self.num(id, "y1"));
                let p1 = Point::new(self.num(id, "x2"), self.num(id, "y2"));
                Some(Rect::from_points(p0, p1))
            }
            "polyline" | "polygon" => self.attr(id, "points").and_then(points_rect),
            "path" => {
                let d = self.attr(id, "d")?;
                match BezPath::from_svg(d) {
                    Ok(path) if !path.elements().is_empty() => Some(path.bounding_box()),
                    Ok(_) => None,
                    Err(err) => {
                        tracing::debug!(node = %id, %err, "path data not measurable");
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Local bounds of `id`: own geometry for shapes, union of transformed
    /// children for containers. `None` when nothing has geometry.
    fn local_rect(&self, id: NodeId) -> Option<Rect> {
        let tag = self.tag(id)?;
        match tag {
            "text" | "tspan" | "textPath" | "defs" | "use" | "style" | "title" => None,
            "g" | "svg" | "symbol" | "a" | "body" | "div" => self
                .children(id)
                .into_iter()
                .filter_map(|c| {
                    let rect = self.local_rect(c)?;
                    Some(self.matrix(c).to_affine().transform_rect_bbox(rect))
                })
                .reduce(|a, b| a.union(b)),
            _ => self.shape_rect(id, tag),
        }
    }

    /// Bounding box of `id` in its own user space.
    ///
    /// Detached subtrees are temporarily mounted on a hidden measurement
    /// canvas under `body` and unmounted afterwards, so the node's attachment
    /// state is unchanged on return.
    pub fn bbox(&mut self, id: NodeId) -> BBox {
        if self.is_connected(id) {
            return self.measure(id);
        }

        // Geometry is local, so the mount does not change the result. It keeps
        // the canvas under `body` for exactly the span of one measurement.
        let root = self.subtree_root(id);
        let canvas = self.measure_canvas();
        let body = self.body();
        self.append(body, canvas);
        self.append(canvas, root);
        let bbox = self.measure(id);
        self.detach(root);
        self.detach(canvas);
        bbox
    }

    fn measure(&self, id: NodeId) -> BBox {
        self.local_rect(id).map(BBox::from_rect).unwrap_or_default()
    }

    fn measure_canvas(&mut self) -> NodeId {
        if let Some(canvas) = self.measure_canvas {
            return canvas;
        }
        let canvas = self.create_element("svg");
        self.set_style(canvas, "position", "absolute");
        self.set_style(canvas, "visibility", "hidden");
        self.set_style(canvas, "pointer-events", "none");
        self.measure_canvas = Some(canvas);
        canvas
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/bbox.rs"]
mod tests;
