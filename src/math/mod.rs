//! Vector and matrix types shared by the camera, the clip pipeline and the
//! rasterizer. Every transform uses the row-vector convention (`v * M`).

pub mod mat4;
pub mod vec3;
pub mod vec4;

pub use mat4::{Mat4, RigidTransform};
pub use vec3::Vec3;
pub use vec4::Vec4;
