//! Builder for the options of the `take` endpoint.
//!
//! Every setter appends to the underlying [`ParameterSet`] and hands the
//! builder back, so options read as a single chained expression:
//!
//! ```
//! use screenshotone::TakeOptions;
//!
//! let options = TakeOptions::url("https://example.com")
//!     .format("png")
//!     .full_page(true)
//!     .device_scale_factor(2)
//!     .block_requests(["*analytics*", "*ads*"]);
//! assert_eq!(options.parameters().len(), 6);
//! ```
//!
//! Values are not validated locally; the API rejects what it does not accept.

use crate::params::{Param, ParameterSet};

/// Setters whose value serializes through `ToString` (bools, integers).
macro_rules! scalar_setters {
    ($($(#[$doc:meta])* $method:ident($ty:ty) => $param:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $method(mut self, value: $ty) -> Self {
                self.query.append(Param::$param, value.to_string());
                self
            }
        )+
    };
}

/// Setters for floating point values; see [`format_float`].
macro_rules! float_setters {
    ($($(#[$doc:meta])* $method:ident => $param:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $method(mut self, value: f64) -> Self {
                self.query.append(Param::$param, format_float(value));
                self
            }
        )+
    };
}

macro_rules! text_setters {
    ($($(#[$doc:meta])* $method:ident => $param:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $method(mut self, value: impl Into<String>) -> Self {
                self.query.append(Param::$param, value);
                self
            }
        )+
    };
}

/// Setters that append one entry per supplied value, in order.
macro_rules! list_setters {
    ($($(#[$doc:meta])* $method:ident => $param:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $method<I, S>(mut self, values: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                for value in values {
                    self.query.append(Param::$param, value);
                }
                self
            }
        )+
    };
}

/// Shortest round-trip form for finite values (`10`, `0.1`, `99.98765`);
/// `+Inf`, `-Inf` and `NaN` otherwise.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

/// Options for a single screenshot request.
///
/// Not synchronized: build one from a single thread, then pass it to the
/// client by reference as many times as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct TakeOptions {
    query: ParameterSet,
}

impl TakeOptions {
    fn with_source(param: Param, value: impl Into<String>) -> Self {
        let mut query = ParameterSet::new();
        query.append(param, value);
        Self { query }
    }

    /// Render the page at `url`.
    pub fn url(url: impl Into<String>) -> Self {
        Self::with_source(Param::Url, url)
    }

    /// Render inline HTML markup.
    pub fn html(html: impl Into<String>) -> Self {
        Self::with_source(Param::Html, html)
    }

    /// Render inline Markdown.
    pub fn markdown(markdown: impl Into<String>) -> Self {
        Self::with_source(Param::Markdown, markdown)
    }

    /// Append a raw value under any known parameter.
    pub fn set(mut self, param: Param, value: impl Into<String>) -> Self {
        self.query.append(param, value);
        self
    }

    /// Parameters accumulated so far.
    pub fn parameters(&self) -> &ParameterSet {
        &self.query
    }

    scalar_setters! {
        /// Image quality for `jpeg` and `webp` output.
        image_quality(u32) => ImageQuality;
        /// Resize the result to this width (pixels).
        image_width(u32) => ImageWidth;
        /// Resize the result to this height (pixels).
        image_height(u32) => ImageHeight;
        /// Transparent background when the site does not set one (`png`, `webp`).
        omit_background(bool) => OmitBackground;

        /// Render the full page.
        full_page(bool) => FullPage;
        /// Scroll through the page before a full page capture to trigger lazy loading.
        full_page_scroll(bool) => FullPageScroll;
        /// Delay between scroll steps (milliseconds).
        full_page_scroll_delay(u32) => FullPageScrollDelay;
        /// Distance of each scroll step (pixels).
        full_page_scroll_by(u32) => FullPageScrollBy;
        /// Upper bound for the full page height (pixels).
        full_page_max_height(u32) => FullPageMaxHeight;
        /// Scroll the `selector` element into view before capturing it.
        selector_scroll_into_view(bool) => SelectorScrollIntoView;
        /// Fail instead of capturing the whole page when `selector` matches nothing.
        error_on_selector_not_found(bool) => ErrorOnSelectorNotFound;
        /// Capture content that lies outside the viewport.
        capture_beyond_viewport(bool) => CaptureBeyondViewport;
        /// Left edge of the clip rectangle (pixels).
        clip_x(i32) => ClipX;
        /// Top edge of the clip rectangle (pixels).
        clip_y(i32) => ClipY;
        /// Width of the clip rectangle (pixels).
        clip_width(u32) => ClipWidth;
        /// Height of the clip rectangle (pixels).
        clip_height(u32) => ClipHeight;

        /// Width of the browser viewport (pixels).
        viewport_width(u32) => ViewportWidth;
        /// Height of the browser viewport (pixels).
        viewport_height(u32) => ViewportHeight;
        /// Device scale factor, usually 1, 2 or 3.
        device_scale_factor(u32) => DeviceScaleFactor;
        /// Honor the `meta viewport` tag like a mobile browser.
        viewport_mobile(bool) => ViewportMobile;
        /// Report touch event support.
        viewport_has_touch(bool) => ViewportHasTouch;
        /// Landscape orientation.
        viewport_landscape(bool) => ViewportLandscape;

        /// Print background graphics into the PDF.
        pdf_print_background(bool) => PdfPrintBackground;
        /// Fit the whole page onto a single PDF page.
        pdf_fit_one_page(bool) => PdfFitOnePage;
        /// Landscape paper orientation.
        pdf_landscape(bool) => PdfLandscape;

        /// Block ads.
        block_ads(bool) => BlockAds;
        /// Hide cookie consent banners.
        block_cookie_banners(bool) => BlockCookieBanners;
        /// Hide banners detected by layout heuristics.
        block_banners_by_heuristics(bool) => BlockBannersByHeuristics;
        /// Block chat widgets.
        block_chats(bool) => BlockChats;
        /// Block tracking scripts.
        block_trackers(bool) => BlockTrackers;

        /// Offset applied after `scroll_into_view` (pixels).
        scroll_into_view_adjust_top(i32) => ScrollIntoViewAdjustTop;
        /// Emulate `prefers-color-scheme: dark`.
        dark_mode(bool) => DarkMode;
        /// Emulate `prefers-reduced-motion: reduce`.
        reduced_motion(bool) => ReducedMotion;

        /// Cache the result on the API side.
        cache(bool) => Cache;
        /// Cache lifetime (seconds).
        cache_ttl(u32) => CacheTtl;

        /// Ignore the page's Content Security Policy.
        bypass_csp(bool) => BypassCsp;
        /// Take the screenshot even when the site answers with an error status.
        ignore_host_errors(bool) => IgnoreHostErrors;

        /// Accuracy of the emulated position (meters).
        geolocation_accuracy(u32) => GeolocationAccuracy;

        /// Wait before taking the screenshot (seconds).
        delay(u32) => Delay;
        /// Overall rendering timeout (seconds).
        timeout(u32) => Timeout;
        /// Timeout for the page navigation alone (seconds).
        navigation_timeout(u32) => NavigationTimeout;

        /// Upload the result to the configured storage.
        store(bool) => Store;
        /// Return the stored object's location instead of the image.
        storage_return_location(bool) => StorageReturnLocation;

        /// Return immediately and render in the background.
        run_async(bool) => Async;
        /// Sign webhook deliveries.
        webhook_sign(bool) => WebhookSign;
        /// Deliver failures to the webhook too.
        webhook_errors(bool) => WebhookErrors;

        /// Report the image dimensions in response headers.
        metadata_image_size(bool) => MetadataImageSize;
        /// Report the fonts used by the page.
        metadata_fonts(bool) => MetadataFonts;
        /// Report the page's Open Graph tags.
        metadata_open_graph(bool) => MetadataOpenGraph;
        /// Report the page title.
        metadata_page_title(bool) => MetadataPageTitle;
        /// Return the page content alongside the image.
        metadata_content(bool) => MetadataContent;
        /// Report the status code the page answered with.
        metadata_http_response_status_code(bool) => MetadataHttpResponseStatusCode;
        /// Report the headers the page answered with.
        metadata_http_response_headers(bool) => MetadataHttpResponseHeaders;
        /// Report the page's favicon.
        metadata_icon(bool) => MetadataIcon;

        /// Token limit for the vision model's answer.
        vision_max_tokens(u32) => VisionMaxTokens;
    }

    float_setters! {
        /// Latitude of the emulated position. Longitude is required alongside it.
        geolocation_latitude => GeolocationLatitude;
        /// Longitude of the emulated position. Latitude is required alongside it.
        geolocation_longitude => GeolocationLongitude;
    }

    text_setters! {
        /// Response format, e.g. `png`, `jpeg`, `jpg`, `webp` or `pdf`.
        format => Format;
        /// `by_format`, `empty` or `json`.
        response_type => ResponseType;
        /// File name suggested through `Content-Disposition`.
        attachment_name => AttachmentName;

        /// `default` or `by_sections`.
        full_page_algorithm => FullPageAlgorithm;
        /// Capture only the element matching this CSS selector.
        selector => Selector;

        /// Emulate a named device, e.g. `iphone_13`.
        viewport_device => ViewportDevice;

        /// Paper format for PDF output, e.g. `a4` or `letter`.
        pdf_paper_format => PdfPaperFormat;
        /// Margin on every side of a PDF page, e.g. `10px` or `1cm`.
        pdf_margin => PdfMargin;
        /// Top PDF margin.
        pdf_margin_top => PdfMarginTop;
        /// Right PDF margin.
        pdf_margin_right => PdfMarginRight;
        /// Bottom PDF margin.
        pdf_margin_bottom => PdfMarginBottom;
        /// Left PDF margin.
        pdf_margin_left => PdfMarginLeft;

        /// CSS injected into the page.
        styles => Styles;
        /// JavaScript executed in the page.
        scripts => Scripts;
        /// Click the element matching this selector before rendering.
        click => Click;
        /// Scroll the element matching this selector into view.
        scroll_into_view => ScrollIntoView;
        /// `screen` or `print`.
        media_type => MediaType;

        /// Distinguish cached results for otherwise identical options.
        cache_key => CacheKey;

        /// User agent for the page request.
        user_agent => UserAgent;
        /// `Authorization` header for the page request.
        authorization => Authorization;
        /// Time zone for the page, e.g. `Europe/Berlin`.
        time_zone => TimeZone;
        /// Render from an IP address in this country, e.g. `us`.
        ip_country_code => IpCountryCode;
        /// Route the page request through this proxy.
        proxy => Proxy;

        /// Wait until an element matches this selector.
        wait_for_selector => WaitForSelector;
        /// `at_least_one` or `at_least_by_count`.
        wait_for_selector_algorithm => WaitForSelectorAlgorithm;

        /// Object key for the stored result, without extension.
        storage_path => StoragePath;
        /// S3-compatible endpoint of the storage.
        storage_endpoint => StorageEndpoint;
        /// Access key id for the storage.
        storage_access_key_id => StorageAccessKeyId;
        /// Secret access key for the storage.
        storage_secret_access_key => StorageSecretAccessKey;
        /// Bucket receiving the result.
        storage_bucket => StorageBucket;
        /// Storage class of the uploaded object.
        storage_class => StorageClass;
        /// Canned ACL of the uploaded object, e.g. `public-read`.
        storage_acl => StorageAcl;

        /// Where the result is delivered when rendering asynchronously.
        webhook_url => WebhookUrl;
        /// Caller-side identifier echoed back in webhooks.
        external_identifier => ExternalIdentifier;

        /// OpenAI key used for `vision_prompt`.
        openai_api_key => OpenaiApiKey;
        /// Prompt answered by the vision model about the screenshot.
        vision_prompt => VisionPrompt;
    }

    list_setters! {
        /// Block requests by URL, domain or a simple `*` pattern.
        block_requests => BlockRequests;
        /// Block resources by type: `document`, `stylesheet`, `image`,
        /// `media`, `font`, `script`, `texttrack`, `xhr`, `fetch`,
        /// `eventsource`, `websocket`, `manifest` or `other`.
        block_resources => BlockResources;
        /// Events to wait for after injected scripts ran.
        scripts_wait_until => ScriptsWaitUntil;
        /// Hide elements matching these selectors.
        hide_selectors => HideSelectors;
        /// Cookies for the page request, e.g. `key=value`.
        cookies => Cookies;
        /// Extra headers for the page request, e.g. `X-Header: value`.
        headers => Headers;
        /// Navigation events to wait for, e.g. `load` or `networkidle0`.
        wait_until => WaitUntil;
        /// Fail when the page contains any of these strings.
        fail_if_content_contains => FailIfContentContains;
        /// Fail when the page lacks any of these strings.
        fail_if_content_missing => FailIfContentMissing;
    }
}
