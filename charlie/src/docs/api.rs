/*!
# Charlie API documentation

This page describes the API endpoints available on Charlie.

## Sightseeing

Endpoints: `/v1/get_sight_seeing` and `/v1/get_all_sight_seeing`

Example: `/v1/get_sight_seeing?destination=Lisbon`

Both endpoints search the upstream tour provider for tours around a
destination and answer with a normalized list. `get_sight_seeing` returns the
best rated tours, four by default. `get_all_sight_seeing` returns every tour in
the order the provider sent them. The post-processing of each endpoint is set
by `sightseeing.top` and `sightseeing.all` in the settings.

### Parameters

- `destination` - Free text naming where the user is going. Read from the
  query string, or from the `destination` field of a JSON body when the query
  string does not have one. An empty value counts as missing.

### Response

A JSON object with these keys:

- `agent` - The name of the agent answering, `Charlie` by default.
- `extractedInfo` - The destination the tours were searched for.
- `sightSeeing` - A list of tours. Each tour has:
  - `category` - The provider's category, passed through. Left out if the
    provider did not send one.
  - `description`, `image`, `title` - Passed through, or `"N/A"` if the
    provider sent nothing, an empty string, `null`, `false`, or `0`.
  - `link` - The provider's `url`, with the same fallback.
  - `price` - An object with `price` (the provider's `price.total`, or `"N/A"`)
    and `currency` (the provider's `price.currency`, or `"USD"`).
  - `rating` - The provider's rating, passed through. Left out if the provider
    did not send one.

When ranking, tours with a numeric rating come first, highest first. Tours
without a numeric rating follow in the order the provider sent them.

### Response Status Codes

- 200 OK - Tours provided normally. The list may be empty.
- 400 Bad Request - No destination given. Body: `{"error": "Destination is required"}`.
- 404 Not Found - The provider did not answer with a list of tours. Body:
  `{"error": "No sightseeing data found", "apiResponse": <provider body>}`.
- 500 Internal Server Error - The provider could not be reached or rejected the
  request. Body: `{"error": "Failed to fetch sightSeeing details", "details":
  <message>, "apiError": <provider body, or "No additional details">}`.

## Health

Endpoint: `/api/v1/health`

Answers `{"status": "OK", "server": "Charlie", "uptime": <seconds>}` while the
server is running.

*/
