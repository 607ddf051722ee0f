use core::{any::Any, fmt, str::FromStr};

use exdetail_internals::{Reflect, Shape, TypeInfo};
use url::Url;

/// Type descriptor of [`Uri`].
pub static URI: TypeInfo = TypeInfo::new::<Uri>("Uri", concat!(module_path!(), "::Uri"));

/// A parsed URI. Emitted as its canonical string rather than walked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Uri(Url);

impl Uri {
    /// Parses an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns the parse error of [`url::Url::parse`].
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    /// The parsed URL.
    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Url> for Uri {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for Uri {
    type Err = url::ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Reflect for Uri {
    fn type_info(&self) -> &'static TypeInfo {
        &URI
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Uri(&self.0)
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
