mod mlflow;

pub use mlflow::MlflowClient;
