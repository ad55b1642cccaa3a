use camino::Utf8PathBuf;

/// Generator output that does not have the shape the patch passes rely on.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("model interface {interface} has no matching implementation {expected}")]
    MissingImpl {
        interface: Utf8PathBuf,
        expected: Utf8PathBuf,
    },
    #[error("model implementation {0} has no matching interface")]
    LoneImpl(Utf8PathBuf),
    #[error("implementation {0} does not declare a discriminator field after its class declaration")]
    MalformedImpl(Utf8PathBuf),
    #[error("resource {0} does not declare a root @Path")]
    MissingRootPath(Utf8PathBuf),
    #[error("reached end of resource {0} without encountering response subclasses")]
    MissingResponseClasses(Utf8PathBuf),
}
