mod builder;
mod definition;
mod router;
mod segment;
mod value;

pub use builder::ParamRouterBuilder;
pub use definition::PathDefinition;
pub use router::{ParamRouter, Route, Routes, SocketRouter};
pub use segment::{PathSegment, SegmentType};
pub use value::{Matches, Value};
