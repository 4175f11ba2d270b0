pub mod session {

    /// Key under which the authenticated session record is stored.
    pub const AUTH_KEY: &str = "auth";
}

pub mod messages {

    pub const ACCOUNT_CREATED: &str = "Account created!";

    pub const CREDENTIALS_REQUIRED: &str = "Username and password are required.";

    pub const LOGIN_SUCCESS: &str = "Login successful!\nRedirecting to Gallery...";

    pub const INVALID_USERNAME: &str = "Username is not valid.";

    pub const LOGGED_OUT: &str = "Logged out successfully.";

    pub const ALREADY_LOGGED_IN: &str = "You are already logged in.\nRedirecting to Gallery...";

    pub const PLEASE_LOGIN: &str = "Please Login to visit Gallery";

    pub const NOT_LOGGED_IN: &str = "Not logged in";

    pub const MOVIE_ADDED: &str = "Movie added successfully.";

    pub const MOVIE_UPDATED: &str = "Movie updated successfully.";

    pub const MOVIE_REMOVED: &str = "Movie removed successfully.";

    pub const COMMENT_SAVED: &str = "Comment saved.";

    pub const EMPTY_COMMENT: &str = "Comment cannot be empty.";

    pub const MOVIE_NOT_FOUND: &str = "Movie not found.";

    pub const MOVIE_ID_REQUIRED: &str = "Movie ID is required.";

    pub const INVALID_MOVIE_ID: &str = "Invalid movie ID.";

    pub const EDITOR_REQUIRED: &str = "Only Content Editors can change the catalog.";

    pub const INVALID_VOTE_REQUEST: &str = "Invalid request.";

    pub const VOTE_FAILED: &str = "Failed to update like/dislike.";
}
