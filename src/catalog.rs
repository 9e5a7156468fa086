use crate::model::Translatable;

/// Static bilingual titles for every table key a pipeline can produce,
/// plus the synthetic empty-result entry.
pub struct TableTitleCatalog;

impl TableTitleCatalog {
    pub fn title(key: &str) -> Translatable {
        match key {
            "twitter_interests" => Translatable::new(
                "Your interests according to Twitter:",
                "Jouw interesses volgens Twitter:",
            ),
            "twitter_account_created_at" => Translatable::new(
                "Creation date of your account on Twitter:",
                "Datum waarop je account is aangemaakt op Twitter:",
            ),
            "instagram_your_topics" => Translatable::new(
                "Topics your interested in according to Instagram:",
                "Onderwerpen waar jij volgens Instagram geintereseerd in bent:",
            ),
            "instagram_interests" => Translatable::new(
                "Your interests according to Instagram:",
                "Jouw interesses volgens Instagram:",
            ),
            "instagram_account_created_at" => Translatable::new(
                "Creation date of your account on Instagram:",
                "Datum waarop je account is aangemaakt op Instagram:",
            ),
            "facebook_your_topics" => Translatable::new(
                "Topics your interested in according to Facebook:",
                "Onderwerpen waar jij volgens Facebook geintereseerd in bent:",
            ),
            "facebook_interests" => Translatable::new(
                "Your interests according to Facebook:",
                "Jouw interesses volgens Facebook:",
            ),
            "facebook_account_created_at" => Translatable::new(
                "Creation date of your account on Facebook:",
                "Datum waarop je account is aangemaakt op Facebook:",
            ),
            "youtube_watch_history" => Translatable::new(
                "Video's you watched on YouTube:",
                "Video's die je gekeken hebt op Youtube:",
            ),
            "youtube_subscriptions" => Translatable::new(
                "Channels you are subscribed to on Youtube:",
                "Kanalen waarop je geabboneerd bent op Youtube:",
            ),
            "youtube_comments" => Translatable::new(
                "Comments you posted on Youtube:",
                "Reacties die je hebt geplaats op Youtube:",
            ),
            "empty_result_set" => Translatable::new(
                "We could not extract any data:",
                "We konden de gegevens niet in je donatie vinden:",
            ),
            other => Translatable::new(other, other),
        }
    }

    pub fn keys() -> Vec<&'static str> {
        vec![
            "twitter_interests",
            "twitter_account_created_at",
            "instagram_your_topics",
            "instagram_interests",
            "instagram_account_created_at",
            "facebook_your_topics",
            "facebook_interests",
            "facebook_account_created_at",
            "youtube_watch_history",
            "youtube_subscriptions",
            "youtube_comments",
            "empty_result_set",
        ]
    }
}
