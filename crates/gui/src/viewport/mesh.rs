use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// CPU-side mesh data: interleaved [pos.x, pos.y, pos.z, norm.x, norm.y, norm.z, r, g, b]
#[derive(Clone, Debug)]
pub struct MeshData {
    /// 9 floats per vertex: position(3) + normal(3) + color(3)
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub const STRIDE: usize = 9;

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / Self::STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> Vec3 {
        let base = i * Self::STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Normal of vertex `i`
    pub fn normal(&self, i: usize) -> Vec3 {
        let base = i * Self::STRIDE;
        Vec3::new(
            self.vertices[base + 3],
            self.vertices[base + 4],
            self.vertices[base + 5],
        )
    }
}

/// Flat disc in the XY plane facing +Z, built as a triangle fan around the center.
pub fn circle(radius: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments as usize + 1) * MeshData::STRIDE);
    let mut indices = Vec::with_capacity(segments as usize * 3);

    // Center
    push_vert(&mut vertices, 0.0, 0.0, 0.0, Vec3::Z, color);

    for i in 0..segments {
        let a = (i as f32) * std::f32::consts::TAU / segments as f32;
        push_vert(&mut vertices, radius * a.cos(), radius * a.sin(), 0.0, Vec3::Z, color);
    }

    for i in 0..segments {
        let current = 1 + i;
        let next = 1 + (i + 1) % segments;
        indices.extend_from_slice(&[0, current, next]);
    }

    MeshData { vertices, indices }
}

/// Unit primitives shared by the scene demos. Size, placement and color come
/// from the instance transform and a uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// 1x1x1 box centered at the origin
    Cube,
    /// Radius 1
    Sphere,
    /// Radius 1, height 2, apex up
    Cone,
    /// Four-sided cone, radius 1, height 1
    Pyramid,
    /// 1x1 quad in XY facing +Z
    Plane,
    Torus,
    TorusKnot,
}

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::Cube,
        Shape::Sphere,
        Shape::Cone,
        Shape::Pyramid,
        Shape::Plane,
        Shape::Torus,
        Shape::TorusKnot,
    ];

    pub fn build(self) -> MeshData {
        const WHITE: [f32; 3] = [1.0; 3];
        match self {
            Shape::Cube => cuboid(1.0, 1.0, 1.0, WHITE),
            Shape::Sphere => sphere(1.0, 16, 16, WHITE),
            Shape::Cone => cone(1.0, 2.0, 32, WHITE),
            Shape::Pyramid => cone(1.0, 1.0, 4, WHITE),
            Shape::Plane => plane(1.0, 1.0, WHITE),
            Shape::Torus => torus(1.0, 0.4, 16, 60, WHITE),
            Shape::TorusKnot => torus_knot(0.8, 0.35, 100, 16, WHITE),
        }
    }
}

/// Axis-aligned box centered at the origin, four vertices per face.
pub fn cuboid(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let half = Vec3::new(w, h, d) * 0.5;
    let mut vertices = Vec::with_capacity(24 * MeshData::STRIDE);
    let mut indices = Vec::with_capacity(36);

    // (normal, u axis, v axis); u x v == normal
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    for (n, u, v) in faces {
        let base = (vertices.len() / MeshData::STRIDE) as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (n + u * su + v * sv) * half;
            push_vert(&mut vertices, p.x, p.y, p.z, n, color);
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

/// Quad in the XY plane facing +Z.
pub fn plane(w: f32, h: f32, color: [f32; 3]) -> MeshData {
    let (hw, hh) = (w * 0.5, h * 0.5);
    let mut vertices = Vec::with_capacity(4 * MeshData::STRIDE);
    for (x, y) in [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)] {
        push_vert(&mut vertices, x, y, 0.0, Vec3::Z, color);
    }
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// UV sphere centered at the origin.
pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let (rings, sectors) = (rings.max(2), sectors.max(3));
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for r in 0..=rings {
        let phi = PI * r as f32 / rings as f32;
        for s in 0..=sectors {
            let theta = TAU * s as f32 / sectors as f32;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            let p = n * radius;
            push_vert(&mut vertices, p.x, p.y, p.z, n, color);
        }
    }

    let row = sectors + 1;
    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * row + s;
            let i2 = i0 + row;
            indices.extend_from_slice(&[i0, i2, i0 + 1, i0 + 1, i2, i2 + 1]);
        }
    }

    MeshData { vertices, indices }
}

/// Cone centered on its half height, apex on +Y, closed at the base.
pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let segments = segments.max(3);
    let hh = height * 0.5;
    let slope = radius / height;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let rim = |i: u32| {
        let a = i as f32 * TAU / segments as f32;
        (a.cos(), a.sin())
    };

    for i in 0..segments {
        let (c0, s0) = rim(i);
        let (c1, s1) = rim(i + 1);
        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();

        let base = (vertices.len() / MeshData::STRIDE) as u32;
        push_vert(&mut vertices, 0.0, hh, 0.0, (n0 + n1).normalize(), color);
        push_vert(&mut vertices, radius * c1, -hh, radius * s1, n1, color);
        push_vert(&mut vertices, radius * c0, -hh, radius * s0, n0, color);
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Base cap, facing down
    let center = (vertices.len() / MeshData::STRIDE) as u32;
    push_vert(&mut vertices, 0.0, -hh, 0.0, Vec3::NEG_Y, color);
    for i in 0..segments {
        let (c, s) = rim(i);
        push_vert(&mut vertices, radius * c, -hh, radius * s, Vec3::NEG_Y, color);
    }
    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[center, center + 1 + i, center + 1 + next]);
    }

    MeshData { vertices, indices }
}

/// Ring around the Z axis: `radius` to the tube center, `tube` thick.
pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32, color: [f32; 3]) -> MeshData {
    let (radial, tubular) = (radial.max(3), tubular.max(3));
    let mut vertices = Vec::new();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            let p = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let n = (p - Vec3::new(radius * u.cos(), radius * u.sin(), 0.0)).normalize();
            push_vert(&mut vertices, p.x, p.y, p.z, n, color);
        }
    }

    MeshData {
        vertices,
        indices: grid_indices(radial, tubular),
    }
}

/// (2, 3) torus knot: a tube of radius `tube` swept along the knot curve.
pub fn torus_knot(radius: f32, tube: f32, tubular: u32, radial: u32, color: [f32; 3]) -> MeshData {
    const P: f32 = 2.0;
    const Q: f32 = 3.0;
    let (tubular, radial) = (tubular.max(3), radial.max(3));

    let curve = |u: f32| {
        let qu = Q / P * u;
        let r = radius * (2.0 + qu.cos()) * 0.5;
        Vec3::new(r * u.cos(), r * u.sin(), radius * qu.sin() * 0.5)
    };

    let mut vertices = Vec::new();
    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * P * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frame around the curve
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1).normalize();
        let normal = binormal.cross(tangent).normalize();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let p = p1 - normal * (tube * v.cos()) + binormal * (tube * v.sin());
            let n = (p - p1).normalize();
            push_vert(&mut vertices, p.x, p.y, p.z, n, color);
        }
    }

    MeshData {
        vertices,
        indices: grid_indices(tubular, radial),
    }
}

/// Two triangles per cell of a (rows + 1) x (cols + 1) vertex grid
fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let stride = cols + 1;
    let mut indices = Vec::with_capacity((rows * cols * 6) as usize);
    for r in 0..rows {
        for c in 0..cols {
            let a = r * stride + c;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }
    indices
}

fn push_vert(vertices: &mut Vec<f32>, x: f32, y: f32, z: f32, n: Vec3, color: [f32; 3]) {
    vertices.extend_from_slice(&[x, y, z, n.x, n.y, n.z, color[0], color[1], color[2]]);
}
