#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_property as property;

pub use vc_property::{Evaluator, PropertyError, PropertyExpression, Reflect};
