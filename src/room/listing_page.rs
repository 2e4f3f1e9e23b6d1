/// Feed and directory pages where no viewer count is shown.
const LISTING_PAGES: [&str; 8] = [
    "https://live.douyin.com/",
    "https://live.douyin.com",
    "https://www.douyin.com/follow",
    "https://www.douyin.com/follow/live",
    "https://www.douyin.com/discover",
    "https://www.douyin.com/vs",
    "https://www.douyin.com/series",
    "https://www.douyin.com/?recommend=1",
];

const INTERNAL_ROUTE_PREFIX: &str = "https://www.douyin.com/root/";

/// Exact string comparison, no normalization of trailing slashes or query strings.
pub fn is_listing_page(url: &str) -> bool {
    LISTING_PAGES.contains(&url) || url.starts_with(INTERNAL_ROUTE_PREFIX)
}
