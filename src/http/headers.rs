use http::{HeaderName, HeaderValue};

use crate::{Error, Result};

/// Ordered header list; names are lowercase and duplicates are allowed.
pub type Headers = Vec<(HeaderName, HeaderValue)>;

pub trait HeadersExt {
    fn headers(&self) -> &Headers;

    fn headers_mut(&mut self) -> &mut Headers;

    fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        let name = name.as_ref();
        self.headers()
            .iter()
            .find(|(key, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|value| value.to_str().ok())
    }

    /// Replaces every header with the same name, keeping the position of the first one.
    fn insert_header<K, V>(&mut self, name: K, value: V) -> Result<()>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
        V: TryInto<HeaderValue>,
        V::Error: Into<http::Error>,
    {
        let (name, value) = convert(name, value)?;
        let headers = self.headers_mut();
        match headers.iter().position(|(key, _)| *key == name) {
            Some(i) => {
                headers[i].1 = value;
                let mut index = 0;
                headers.retain(|(key, _)| {
                    index += 1;
                    index - 1 <= i || *key != name
                });
            }
            None => headers.push((name, value)),
        }
        Ok(())
    }

    fn append_header<K, V>(&mut self, name: K, value: V) -> Result<()>
    where
        K: TryInto<HeaderName>,
        K::Error: Into<http::Error>,
        V: TryInto<HeaderValue>,
        V::Error: Into<http::Error>,
    {
        let header = convert(name, value)?;
        self.headers_mut().push(header);
        Ok(())
    }

    fn remove_header(&mut self, name: impl AsRef<str>) -> Option<HeaderValue> {
        let name = name.as_ref();
        let headers = self.headers_mut();
        let first = headers
            .iter()
            .position(|(key, _)| key.as_str().eq_ignore_ascii_case(name))?;
        let (_, value) = headers.remove(first);
        headers.retain(|(key, _)| !key.as_str().eq_ignore_ascii_case(name));
        Some(value)
    }
}

impl HeadersExt for Headers {
    fn headers(&self) -> &Headers {
        self
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self
    }
}

fn convert<K, V>(name: K, value: V) -> Result<(HeaderName, HeaderValue)>
where
    K: TryInto<HeaderName>,
    K::Error: Into<http::Error>,
    V: TryInto<HeaderValue>,
    V::Error: Into<http::Error>,
{
    let name = name
        .try_into()
        .map_err(|e| Error::App(anyhow::Error::from(e.into())))?;
    let value = value
        .try_into()
        .map_err(|e| Error::App(anyhow::Error::from(e.into())))?;
    Ok((name, value))
}
