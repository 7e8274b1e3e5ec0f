pub struct Member {
    pub name: String,
    pub avatar_url: Option<String>,
}
