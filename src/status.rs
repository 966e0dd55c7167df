use std::fmt;

/// User-facing status line shown under the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    NoBackground,
    LogoRequired,
    Ready,
    BackgroundLoadFailed,
    LogoLoadFailed,
    ExportFailed,
}

impl Status {
    pub fn message(self) -> &'static str {
        match self {
            Status::NoBackground => "Pick a base image to start.",
            Status::LogoRequired => "Upload a logo to enable download.",
            Status::Ready => "",
            Status::BackgroundLoadFailed => "Failed to load base image.",
            Status::LogoLoadFailed => "Failed to load logo.",
            Status::ExportFailed => "Download failed.",
        }
    }

    pub fn is_error(self) -> bool {
        matches!(
            self,
            Status::BackgroundLoadFailed | Status::LogoLoadFailed | Status::ExportFailed
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
