use glam::{Vec2, Vec3};

/// Elements per leaf before a node is split.
const LEAF_SIZE: usize = 4;

/// Default ray start offset, avoids self-hits at the origin surface.
pub const RAY_EPS: f32 = 1e-4;

/// Half-line `origin + t * dir` for `t` in `[tmin, tmax]`.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
    pub tmin: f32,
    pub tmax: f32,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir,
            tmin: RAY_EPS,
            tmax: f32::MAX,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |bbox, &p| bbox.expand(p))
    }

    #[inline]
    pub fn expand(self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Slab test against a ray with precomputed reciprocal direction.
    ///
    /// Axes the ray does not move along only check the origin, so rays
    /// running exactly on a box face still count as inside.
    #[inline]
    fn hit(&self, ray: &Ray, inv_dir: Vec3) -> bool {
        let mut tnear = ray.tmin;
        let mut tfar = ray.tmax;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            if ray.dir[axis] == 0.0 {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return false;
                }
                continue;
            }
            let t0 = (self.min[axis] - origin) * inv_dir[axis];
            let t1 = (self.max[axis] - origin) * inv_dir[axis];
            let (t0, t1) = if t0 > t1 { (t1, t0) } else { (t0, t1) };
            tnear = tnear.max(t0);
            // Slightly widened so that flat boxes are not lost to rounding.
            tfar = tfar.min(t1 * (1.0 + 2.0 * f32::EPSILON));
            if tnear > tfar {
                return false;
            }
        }
        true
    }
}

/// Closest intersection reported by [`Bvh`] queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BvhHit {
    /// Index of the intersected triangle or quad.
    pub element: usize,
    /// Interpolation coordinates inside the element.
    pub uv: Vec2,
    pub distance: f32,
}

#[derive(Clone, Debug)]
struct BvhNode {
    bbox: Aabb,
    /// Leaves: first slot in `primitives`. Internal: index of the left child.
    start: u32,
    /// Leaves: number of primitives. Internal: 0.
    count: u32,
}

/// Static bounding volume hierarchy over the elements of one mesh.
///
/// Nodes live in a flat array; the two children of an internal node are
/// stored next to each other. Built once by median split along the axis of
/// largest centroid extent and never refit.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<u32>,
}

impl Bvh {
    pub fn from_triangles(triangles: &[[u32; 3]], positions: &[Vec3]) -> Self {
        let bboxes: Vec<Aabb> = triangles
            .iter()
            .map(|t| Aabb::from_points(&t.map(|v| positions[v as usize])))
            .collect();
        Self::build(&bboxes)
    }

    pub fn from_quads(quads: &[[u32; 4]], positions: &[Vec3]) -> Self {
        let bboxes: Vec<Aabb> = quads
            .iter()
            .map(|q| Aabb::from_points(&q.map(|v| positions[v as usize])))
            .collect();
        Self::build(&bboxes)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn build(bboxes: &[Aabb]) -> Self {
        if bboxes.is_empty() {
            return Self::default();
        }

        let centers: Vec<Vec3> = bboxes.iter().map(Aabb::center).collect();
        let mut primitives: Vec<u32> = (0..bboxes.len() as u32).collect();
        let mut nodes = vec![BvhNode {
            bbox: Aabb::EMPTY,
            start: 0,
            count: 0,
        }];

        // (node, first primitive, one past last primitive)
        let mut stack = vec![(0usize, 0usize, primitives.len())];
        while let Some((node, start, end)) = stack.pop() {
            let range = &mut primitives[start..end];
            let bbox = range
                .iter()
                .fold(Aabb::EMPTY, |b, &p| b.union(bboxes[p as usize]));
            let centroid_bbox = range
                .iter()
                .fold(Aabb::EMPTY, |b, &p| b.expand(centers[p as usize]));
            let extent = centroid_bbox.max - centroid_bbox.min;
            let axis = if extent.x >= extent.y && extent.x >= extent.z {
                0
            } else if extent.y >= extent.z {
                1
            } else {
                2
            };

            nodes[node].bbox = bbox;
            if range.len() <= LEAF_SIZE || extent[axis] <= 0.0 {
                nodes[node].start = start as u32;
                nodes[node].count = range.len() as u32;
                continue;
            }

            let mid = range.len() / 2;
            range.select_nth_unstable_by(mid, |&a, &b| {
                centers[a as usize][axis].total_cmp(&centers[b as usize][axis])
            });

            let left = nodes.len();
            nodes.push(BvhNode {
                bbox: Aabb::EMPTY,
                start: 0,
                count: 0,
            });
            nodes.push(BvhNode {
                bbox: Aabb::EMPTY,
                start: 0,
                count: 0,
            });
            nodes[node].start = left as u32;
            nodes[node].count = 0;
            stack.push((left, start, start + mid));
            stack.push((left + 1, start + mid, end));
        }

        Self { nodes, primitives }
    }

    /// Closest hit against the triangles this hierarchy was built from.
    pub fn intersect_triangles(
        &self,
        triangles: &[[u32; 3]],
        positions: &[Vec3],
        ray: &Ray,
    ) -> Option<BvhHit> {
        self.intersect_with(ray, |element, ray| {
            let [a, b, c] = triangles[element];
            intersect_triangle(
                ray,
                positions[a as usize],
                positions[b as usize],
                positions[c as usize],
            )
        })
    }

    /// Closest hit against the quads this hierarchy was built from.
    pub fn intersect_quads(
        &self,
        quads: &[[u32; 4]],
        positions: &[Vec3],
        ray: &Ray,
    ) -> Option<BvhHit> {
        self.intersect_with(ray, |element, ray| {
            let [a, b, c, d] = quads[element];
            intersect_quad(
                ray,
                positions[a as usize],
                positions[b as usize],
                positions[c as usize],
                positions[d as usize],
            )
        })
    }

    /// Stack-based traversal; `tmax` shrinks as closer hits are found.
    fn intersect_with<F>(&self, ray: &Ray, mut intersect_element: F) -> Option<BvhHit>
    where
        F: FnMut(usize, &Ray) -> Option<(Vec2, f32)>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let mut ray = *ray;
        let inv_dir = ray.dir.recip();
        let mut closest = None;
        let mut stack = vec![0usize];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.bbox.hit(&ray, inv_dir) {
                continue;
            }
            if node.count == 0 {
                stack.push(node.start as usize);
                stack.push(node.start as usize + 1);
                continue;
            }
            let start = node.start as usize;
            for &element in &self.primitives[start..start + node.count as usize] {
                let element = element as usize;
                if let Some((uv, distance)) = intersect_element(element, &ray) {
                    ray.tmax = distance;
                    closest = Some(BvhHit {
                        element,
                        uv,
                        distance,
                    });
                }
            }
        }

        closest
    }
}

/// Möller–Trumbore ray/triangle test. Returns `(uv, distance)`.
pub fn intersect_triangle(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<(Vec2, f32)> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;
    let pvec = ray.dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det == 0.0 {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - p0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray.dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < ray.tmin || t > ray.tmax {
        return None;
    }

    Some((Vec2::new(u, v), t))
}

/// Ray/quad test over triangles `(p0, p1, p3)` and `(p2, p3, p1)`.
///
/// Hits on the second triangle report `1 - uv`, so the result feeds
/// [`crate::math::interpolate_quad`] directly.
pub fn intersect_quad(
    ray: &Ray,
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    p3: Vec3,
) -> Option<(Vec2, f32)> {
    if p2 == p3 {
        return intersect_triangle(ray, p0, p1, p3);
    }

    let mut ray = *ray;
    let mut hit = None;
    if let Some((uv, t)) = intersect_triangle(&ray, p0, p1, p3) {
        ray.tmax = t;
        hit = Some((uv, t));
    }
    if let Some((uv, t)) = intersect_triangle(&ray, p2, p3, p1) {
        hit = Some((Vec2::ONE - uv, t));
    }
    hit
}
