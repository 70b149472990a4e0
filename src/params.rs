//! The closed vocabulary of `take` parameters and the multi-map that
//! accumulates their values.
//!
//! `ParameterSet` keeps names in byte order and the values of each name in
//! append order, which is exactly the order the canonical query string
//! needs. Encoding lives here too because the signature is computed over the
//! bytes this module produces.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

macro_rules! params {
    ($($variant:ident => $name:literal,)+) => {
        /// A parameter understood by the `take` endpoint.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Param {
            $($variant,)+
        }

        impl Param {
            /// Every known parameter, in declaration order.
            pub const ALL: &'static [Param] = &[$(Param::$variant,)+];

            /// Wire name used in the query string.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Param::$variant => $name,)+
                }
            }
        }

        impl FromStr for Param {
            type Err = UnknownParam;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Param::$variant),)+
                    other => Err(UnknownParam(other.to_string())),
                }
            }
        }
    };
}

params! {
    // content source
    Url => "url",
    Html => "html",
    Markdown => "markdown",

    // credentials, managed by the client
    AccessKey => "access_key",

    // output
    Format => "format",
    ResponseType => "response_type",
    ImageQuality => "image_quality",
    ImageWidth => "image_width",
    ImageHeight => "image_height",
    OmitBackground => "omit_background",
    AttachmentName => "attachment_name",

    // full page and selection
    FullPage => "full_page",
    FullPageScroll => "full_page_scroll",
    FullPageScrollDelay => "full_page_scroll_delay",
    FullPageScrollBy => "full_page_scroll_by",
    FullPageMaxHeight => "full_page_max_height",
    FullPageAlgorithm => "full_page_algorithm",
    Selector => "selector",
    SelectorScrollIntoView => "selector_scroll_into_view",
    ErrorOnSelectorNotFound => "error_on_selector_not_found",
    CaptureBeyondViewport => "capture_beyond_viewport",
    ClipX => "clip_x",
    ClipY => "clip_y",
    ClipWidth => "clip_width",
    ClipHeight => "clip_height",

    // viewport and device emulation
    ViewportWidth => "viewport_width",
    ViewportHeight => "viewport_height",
    DeviceScaleFactor => "device_scale_factor",
    ViewportMobile => "viewport_mobile",
    ViewportHasTouch => "viewport_has_touch",
    ViewportLandscape => "viewport_landscape",
    ViewportDevice => "viewport_device",

    // pdf
    PdfPrintBackground => "pdf_print_background",
    PdfFitOnePage => "pdf_fit_one_page",
    PdfLandscape => "pdf_landscape",
    PdfPaperFormat => "pdf_paper_format",
    PdfMargin => "pdf_margin",
    PdfMarginTop => "pdf_margin_top",
    PdfMarginRight => "pdf_margin_right",
    PdfMarginBottom => "pdf_margin_bottom",
    PdfMarginLeft => "pdf_margin_left",

    // blocking
    BlockAds => "block_ads",
    BlockCookieBanners => "block_cookie_banners",
    BlockBannersByHeuristics => "block_banners_by_heuristics",
    BlockChats => "block_chats",
    BlockTrackers => "block_trackers",
    BlockRequests => "block_requests",
    BlockResources => "block_resources",

    // page customization
    Styles => "styles",
    Scripts => "scripts",
    ScriptsWaitUntil => "scripts_wait_until",
    HideSelectors => "hide_selectors",
    Click => "click",
    ScrollIntoView => "scroll_into_view",
    ScrollIntoViewAdjustTop => "scroll_into_view_adjust_top",
    DarkMode => "dark_mode",
    ReducedMotion => "reduced_motion",
    MediaType => "media_type",

    // caching
    Cache => "cache",
    CacheTtl => "cache_ttl",
    CacheKey => "cache_key",

    // request passthrough
    UserAgent => "user_agent",
    Authorization => "authorization",
    Cookies => "cookies",
    Headers => "headers",
    TimeZone => "time_zone",
    IpCountryCode => "ip_country_code",
    Proxy => "proxy",
    BypassCsp => "bypass_csp",
    IgnoreHostErrors => "ignore_host_errors",

    // geolocation
    GeolocationLatitude => "geolocation_latitude",
    GeolocationLongitude => "geolocation_longitude",
    GeolocationAccuracy => "geolocation_accuracy",

    // waiting and timing
    Delay => "delay",
    Timeout => "timeout",
    NavigationTimeout => "navigation_timeout",
    WaitUntil => "wait_until",
    WaitForSelector => "wait_for_selector",
    WaitForSelectorAlgorithm => "wait_for_selector_algorithm",
    FailIfContentContains => "fail_if_content_contains",
    FailIfContentMissing => "fail_if_content_missing",

    // cloud storage
    Store => "store",
    StoragePath => "storage_path",
    StorageEndpoint => "storage_endpoint",
    StorageAccessKeyId => "storage_access_key_id",
    StorageSecretAccessKey => "storage_secret_access_key",
    StorageBucket => "storage_bucket",
    StorageClass => "storage_class",
    StorageAcl => "storage_acl",
    StorageReturnLocation => "storage_return_location",

    // async and webhooks
    Async => "async",
    WebhookUrl => "webhook_url",
    WebhookSign => "webhook_sign",
    WebhookErrors => "webhook_errors",
    ExternalIdentifier => "external_identifier",

    // metadata
    MetadataImageSize => "metadata_image_size",
    MetadataFonts => "metadata_fonts",
    MetadataOpenGraph => "metadata_open_graph",
    MetadataPageTitle => "metadata_page_title",
    MetadataContent => "metadata_content",
    MetadataHttpResponseStatusCode => "metadata_http_response_status_code",
    MetadataHttpResponseHeaders => "metadata_http_response_headers",
    MetadataIcon => "metadata_icon",

    // vision
    OpenaiApiKey => "openai_api_key",
    VisionPrompt => "vision_prompt",
    VisionMaxTokens => "vision_max_tokens",
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a name that is not part of the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParam(pub String);

impl fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown parameter: {}", self.0)
    }
}

impl std::error::Error for UnknownParam {}

/// Bytes left literal in a query component; space is handled separately.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escape a single key or value for the query string (space becomes `+`).
pub fn escape_component(input: &str) -> String {
    // `%` itself is escaped to `%25`, so the only `%20` left is a space.
    utf8_percent_encode(input, QUERY_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

/// Ordered multi-map of parameter name to one or more values.
///
/// Not synchronized; build it from one thread before handing it off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    values: BTreeMap<&'static str, Vec<String>>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `param`, keeping earlier values.
    pub fn append(&mut self, param: Param, value: impl Into<String>) {
        self.values
            .entry(param.as_str())
            .or_default()
            .push(value.into());
    }

    /// Replace every value of `param` with a single one.
    pub fn set(&mut self, param: Param, value: impl Into<String>) {
        self.values.insert(param.as_str(), vec![value.into()]);
    }

    /// Values recorded for `param`, in append order.
    pub fn get(&self, param: Param) -> &[String] {
        self.values
            .get(param.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, param: Param) -> bool {
        self.values.contains_key(param.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of `name=value` pairs the set serializes to.
    pub fn len(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    /// Iterate `(name, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (*name, v.as_str())))
    }

    /// Canonical query string: names ascending, values in append order,
    /// each component escaped on its own.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(&escape_component(name));
            out.push('=');
            out.push_str(&escape_component(value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for param in Param::ALL {
            assert_eq!(param.as_str().parse::<Param>(), Ok(*param));
        }
        assert!("signature".parse::<Param>().is_err());
        assert!("not_a_param".parse::<Param>().is_err());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Param::ALL.iter().map(|p| p.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Param::ALL.len());
    }

    #[test]
    fn escape_matches_form_query_rules() {
        assert_eq!(
            escape_component("https://scalabledeveloper.com"),
            "https%3A%2F%2Fscalabledeveloper.com"
        );
        assert_eq!(
            escape_component("<h1>Hello, world!</h1>"),
            "%3Ch1%3EHello%2C+world%21%3C%2Fh1%3E"
        );
        assert_eq!(escape_component("*example*"), "%2Aexample%2A");
        assert_eq!(escape_component("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(escape_component("100%20"), "100%2520");
        assert_eq!(escape_component("é"), "%C3%A9");
    }

    #[test]
    fn encode_sorts_names_and_keeps_value_order() {
        let mut set = ParameterSet::new();
        set.append(Param::Url, "https://example.com");
        set.append(Param::Cookies, "b=2");
        set.append(Param::BlockAds, "true");
        set.append(Param::Cookies, "a=1");

        assert_eq!(
            set.encode(),
            "block_ads=true&cookies=b%3D2&cookies=a%3D1&url=https%3A%2F%2Fexample.com"
        );
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn set_replaces_all_values() {
        let mut set = ParameterSet::new();
        set.append(Param::AccessKey, "one");
        set.append(Param::AccessKey, "two");
        set.set(Param::AccessKey, "three");
        assert_eq!(set.get(Param::AccessKey), ["three".to_string()]);
    }

    #[test]
    fn empty_set_encodes_to_empty_string() {
        let set = ParameterSet::new();
        assert!(set.is_empty());
        assert_eq!(set.encode(), "");
        assert!(set.get(Param::Url).is_empty());
    }
}
