use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("pixels backend error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error("pixel buffer resize failed: {0}")]
    Texture(#[from] pixels::TextureError),
}
