mod reminder_pass_tests;
