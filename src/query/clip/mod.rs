pub use self::clip_aabb_line::clip_aabb_line;

mod clip_aabb_line;
