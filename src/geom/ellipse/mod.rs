mod geometric;

pub use geometric::GeometricEllipse;
