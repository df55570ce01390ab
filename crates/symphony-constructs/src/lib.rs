// symphony-constructs - The approved construct library
//
// Constructs wrap raw resources with fixed, reviewed defaults:
// EnhancedLambda decides the runtime family from a profile enum,
// Gateway turns versioned route groups into a single HTTP entry point,
// and the storage constructs apply environment-driven retention. The
// LambdaRule aspect rejects any function resource created outside
// EnhancedLambda.

mod aspects;
mod error;
mod function;
mod gateway;
mod graphql;
mod storage;

pub use aspects::LambdaRule;
pub use error::ConstructError;
pub use function::{
    llrt_binary_url, Architecture, BundlingSpec, EnhancedLambda, EnhancedLambdaProps,
    HttpIntegration, LAMBDA_RESOURCE_TYPE, LLRT_EXTERNAL_MODULES,
};
pub use gateway::{Gateway, GatewayProps, HttpMethod, Route, RouteGroup};
pub use graphql::{GraphqlApi, LambdaDataSource};
pub use storage::{Bucket, BucketProps, Table, TableProps};
