mod helpers;
mod redeem_race_test;
mod session_test;
mod sign_in_test;
